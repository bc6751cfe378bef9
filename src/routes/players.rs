use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOP_PLAYERS;
use crate::extractors::QueryParams;
use crate::pipeline::PlayerRecord;
use crate::response::{ok, AppError};
use crate::services::profile_enricher::ProfileDetails;
use crate::state::AppState;
use crate::validation::validate_top_count;

use super::loaded_dashboard;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_players))
        .route("/top", get(top_players))
}

#[derive(Debug, Deserialize)]
struct ListPlayersQuery {
    #[serde(default)]
    name: String,
}

async fn list_players(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<ListPlayersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let board = loaded_dashboard(&state).await?;
    let players: Vec<PlayerRecord> = board.filter_players(&q.name).into_iter().cloned().collect();
    Ok(ok(players))
}

#[derive(Debug, Deserialize)]
struct TopPlayersQuery {
    count: Option<usize>,
    #[serde(default)]
    enrich: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TopPlayer {
    #[serde(flatten)]
    player: PlayerRecord,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    profile: Option<ProfileDetails>,
}

async fn top_players(
    State(state): State<AppState>,
    QueryParams(q): QueryParams<TopPlayersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let count = validate_top_count(q.count.unwrap_or(DEFAULT_TOP_PLAYERS))
        .map_err(|msg| AppError::bad_request("INVALID_COUNT", msg))?;
    let board = loaded_dashboard(&state).await?;
    let top = board.top_players(count);

    if !q.enrich {
        let rows: Vec<TopPlayer> = top
            .into_iter()
            .map(|player| TopPlayer { player, profile: None })
            .collect();
        return Ok(ok(rows));
    }

    let enricher = state.dashboard().enricher();
    let profiles = futures::future::join_all(top.iter().map(|p| async move {
        if p.profile_url.is_empty() {
            None
        } else {
            Some(enricher.enrich(&p.profile_url).await)
        }
    }))
    .await;

    let rows: Vec<TopPlayer> = top
        .into_iter()
        .zip(profiles)
        .map(|(player, profile)| TopPlayer { player, profile })
        .collect();
    Ok(ok(rows))
}
