pub mod clusters;
pub mod health;
pub mod missions;
pub mod players;
pub mod status;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};

use crate::dashboard::Dashboard;
use crate::middleware::request_id;
use crate::response::{AppError, ErrorBody};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/missions", missions::router())
        .nest("/players", players::router())
        .nest("/clusters", clusters::router())
        .merge(status::router());

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback(fallback_404)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

/// The current snapshot, or 503 while none exists or the last refresh found
/// no maps at all.
pub(crate) async fn loaded_dashboard(state: &AppState) -> Result<Arc<Dashboard>, AppError> {
    let Some(board) = state.dashboard().snapshot().await else {
        return Err(AppError::unavailable("Leaderboard data is still loading"));
    };
    if let Some(notice) = &board.report.notice {
        if board.is_empty() {
            return Err(AppError::unavailable(notice));
        }
    }
    Ok(board)
}

async fn fallback_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            success: false,
            code: "NOT_FOUND".to_string(),
            message: "Not found".to_string(),
            trace_id: None,
        }),
    )
}
