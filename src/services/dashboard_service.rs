use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::constants::NO_MAPS_NOTICE;
use crate::dashboard::{Dashboard, LoadReport};
use crate::pipeline::{self, ClusterConfig};

use super::profile_enricher::ProfileEnricher;
use super::record_source::{fetch_all, FetchOutcome, RecordSource, SourceError};

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("record source unavailable: {0}")]
    Source(#[from] SourceError),
    #[error("pipeline task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Owns the current snapshot. Readers clone the `Arc`; a refresh builds a
/// whole new snapshot and swaps it in, so readers never see a partial table.
pub struct DashboardService {
    source: Arc<dyn RecordSource>,
    enricher: Arc<ProfileEnricher>,
    cluster: ClusterConfig,
    snapshot: RwLock<Option<Arc<Dashboard>>>,
    refresh_gate: Mutex<()>,
}

impl DashboardService {
    pub fn new(
        source: Arc<dyn RecordSource>,
        enricher: Arc<ProfileEnricher>,
        cluster: ClusterConfig,
    ) -> Self {
        Self {
            source,
            enricher,
            cluster,
            snapshot: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> Option<Arc<Dashboard>> {
        self.snapshot.read().await.clone()
    }

    pub fn enricher(&self) -> &ProfileEnricher {
        &self.enricher
    }

    /// Fetches, aggregates and clusters from scratch. On failure the previous
    /// snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<Dashboard>, RefreshError> {
        let _gate = self.refresh_gate.lock().await;
        let started = std::time::Instant::now();

        let outcome = match fetch_all(self.source.as_ref()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Refresh aborted, map list unavailable");
                return Err(e.into());
            }
        };

        let cluster = self.cluster.clone();
        let dashboard =
            tokio::task::spawn_blocking(move || build_dashboard(outcome, &cluster)).await?;
        let dashboard = Arc::new(dashboard);

        *self.snapshot.write().await = Some(dashboard.clone());
        self.enricher.clear().await;

        tracing::info!(
            maps_requested = dashboard.report.maps_requested,
            maps_loaded = dashboard.report.maps_loaded,
            warnings = dashboard.report.warnings.len(),
            missions = dashboard.missions.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dashboard refreshed"
        );
        Ok(dashboard)
    }
}

pub fn build_dashboard(outcome: FetchOutcome, cluster: &ClusterConfig) -> Dashboard {
    let output = pipeline::run(&outcome.batches, cluster, &mut rand::thread_rng());

    let notice = (outcome.maps_requested == 0).then(|| NO_MAPS_NOTICE.to_string());

    Dashboard {
        generated_at: Utc::now(),
        clusters: output.assignment.summaries(),
        missions: output.missions,
        players: output.players,
        report: LoadReport {
            maps_requested: outcome.maps_requested,
            maps_loaded: outcome.batches.len(),
            warnings: outcome.warnings,
            notice,
        },
    }
}
