use std::sync::Arc;

use axum::Router;
use tokio::sync::broadcast;

use speedrun_herald::config::{Config, EnrichConfig, RefreshConfig, SourceConfig};
use speedrun_herald::pipeline::embedding::SkipGramConfig;
use speedrun_herald::pipeline::ClusterConfig;
use speedrun_herald::routes::build_router;
use speedrun_herald::services::dashboard_service::DashboardService;
use speedrun_herald::services::profile_enricher::ProfileEnricher;
use speedrun_herald::services::record_source::RecordSource;
use speedrun_herald::state::AppState;

use super::fixtures::{sample_source, FixtureSource};

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
}

/// Built directly so parallel tests never race on process env vars.
pub fn test_config() -> Config {
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "*".to_string(),
        source: SourceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            retry_attempts: 1,
            retry_delay_ms: 0,
        },
        cluster: ClusterConfig {
            n_clusters: 30,
            embedding: SkipGramConfig {
                vector_size: 16,
                epochs: 5,
                seed: Some(7),
                ..SkipGramConfig::default()
            },
            ..ClusterConfig::default()
        },
        enrich: EnrichConfig {
            timeout_secs: 2,
            default_background: "https://cdn.example/bg_dots.png".to_string(),
        },
        refresh: RefreshConfig {
            enabled: false,
            cron: "0 0 * * * *".to_string(),
        },
    }
}

pub async fn spawn_with_source(source: Arc<dyn RecordSource>, load: bool) -> TestApp {
    let config = test_config();
    let enricher = Arc::new(ProfileEnricher::new(&config.enrich));
    let service = Arc::new(DashboardService::new(source, enricher, config.cluster.clone()));
    if load {
        service.refresh().await.expect("initial refresh");
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let state = AppState::new(service, &config, shutdown_tx);
    let app = build_router(state.clone());

    TestApp { app, state, config }
}

/// Sample leaderboard, already loaded.
pub async fn spawn_test_app() -> TestApp {
    spawn_with_source(Arc::new(sample_source()), true).await
}

/// Sample leaderboard that has not been refreshed yet.
pub async fn spawn_unloaded_app() -> TestApp {
    spawn_with_source(Arc::new(sample_source()), false).await
}

/// A source whose map list is empty.
pub async fn spawn_empty_app() -> TestApp {
    spawn_with_source(Arc::new(FixtureSource::default()), true).await
}
