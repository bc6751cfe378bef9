use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::response::{ok, AppError};
use crate::state::AppState;

use super::loaded_dashboard;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_clusters))
}

async fn list_clusters(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let board = loaded_dashboard(&state).await?;
    Ok(ok(board.clusters.clone()))
}
