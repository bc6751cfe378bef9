use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::dashboard::RecordType;
use crate::extractors::QueryParams;
use crate::pipeline::MissionRecord;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::validation::parse_search_date;

use super::loaded_dashboard;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_missions))
        .route("/search", get(search_missions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMissionsQuery {
    #[serde(default)]
    player: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MissionList {
    total: usize,
    missions: Vec<MissionRecord>,
}

async fn list_missions(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<ListMissionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let board = loaded_dashboard(&state).await?;
    let missions: Vec<MissionRecord> = board.filter_by_player(&q.player).into_iter().cloned().collect();
    Ok(ok(MissionList {
        total: missions.len(),
        missions,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    date: String,
    #[serde(default)]
    record_type: RecordType,
    #[serde(default)]
    player: String,
}

async fn search_missions(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<SearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_search_date(&q.date).map_err(|msg| AppError::bad_request("INVALID_DATE", msg))?;
    let board = loaded_dashboard(&state).await?;
    Ok(ok(board.search_by_date(date, q.record_type, &q.player)))
}
