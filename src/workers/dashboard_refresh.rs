//! Scheduled rebuild of the leaderboard snapshot.

use crate::services::dashboard_service::DashboardService;

pub async fn run(service: &DashboardService) {
    tracing::info!("Dashboard refresh worker running");
    match service.refresh().await {
        Ok(board) => {
            if let Some(notice) = &board.report.notice {
                tracing::warn!(notice = %notice, "Refresh produced an empty dashboard");
            }
            for warning in &board.report.warnings {
                tracing::warn!(warning = %warning, "Map skipped during refresh");
            }
        }
        Err(e) => tracing::error!(error = %e, "Scheduled dashboard refresh failed"),
    }
}
