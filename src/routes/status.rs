use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dashboard::LoadReport;
use crate::response::{ok, AppError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/refresh", post(refresh))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusBody {
    loaded: bool,
    generated_at: Option<DateTime<Utc>>,
    missions: usize,
    players: usize,
    clusters: usize,
    report: Option<LoadReport>,
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let body = match state.dashboard().snapshot().await {
        Some(board) => StatusBody {
            loaded: true,
            generated_at: Some(board.generated_at),
            missions: board.missions.len(),
            players: board.players.len(),
            clusters: board.clusters.len(),
            report: Some(board.report.clone()),
        },
        None => StatusBody {
            loaded: false,
            generated_at: None,
            missions: 0,
            players: 0,
            clusters: 0,
            report: None,
        },
    };
    ok(body)
}

async fn refresh(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let board = state.dashboard().refresh().await?;
    Ok(ok(StatusBody {
        loaded: true,
        generated_at: Some(board.generated_at),
        missions: board.missions.len(),
        players: board.players.len(),
        clusters: board.clusters.len(),
        report: Some(board.report.clone()),
    }))
}
