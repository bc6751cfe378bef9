use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderValue};
use speedrun_herald::config::Config;
use speedrun_herald::logging::{init_tracing, LogConfig};
use speedrun_herald::routes::build_router;
use speedrun_herald::services::dashboard_service::DashboardService;
use speedrun_herald::services::profile_enricher::ProfileEnricher;
use speedrun_herald::services::record_source::HttpRecordSource;
use speedrun_herald::state::AppState;
use speedrun_herald::workers::WorkerManager;
use tokio::sync::broadcast;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig::from(&config));
    tracing::info!(source = %config.source.base_url, "Starting speedrun-herald");

    let source = Arc::new(HttpRecordSource::new(&config.source));
    let enricher = Arc::new(ProfileEnricher::new(&config.enrich));
    let service = Arc::new(DashboardService::new(
        source,
        enricher,
        config.cluster.clone(),
    ));

    // The API answers 503 until a snapshot exists, so a failed first load is not fatal.
    if let Err(e) = service.refresh().await {
        tracing::error!(error = %e, "Initial dashboard load failed");
    }

    let (shutdown_tx, _) = broadcast::channel::<()>(8);

    let state = AppState::new(service.clone(), &config, shutdown_tx.clone());

    let worker_manager = WorkerManager::new(service, shutdown_tx.subscribe(), &config.refresh);
    let worker_handle = tokio::spawn(async move {
        if let Err(e) = worker_manager.start().await {
            tracing::error!(error = %e, "Worker manager failed");
        }
    });

    let app = build_router(state)
        .layer(build_cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(%addr, "Listening");
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind TCP listener");
            return;
        }
    };

    let server_future =
        axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(shutdown_tx.clone()));

    // Worker panics are logged; the HTTP server keeps running.
    tokio::spawn(async move {
        match worker_handle.await {
            Err(e) => tracing::error!(error = %e, "Worker task panicked, HTTP server continues"),
            Ok(()) => tracing::info!("Worker manager exited normally"),
        }
    });

    if let Err(e) = server_future.await {
        tracing::error!(error = %e, "HTTP server crashed");
    }
    tracing::info!("Shutdown complete");
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_methods(Any);

    if config.cors_origin.trim() == "*" {
        return base.allow_origin(Any);
    }

    match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => base.allow_origin(origin),
        Err(e) => {
            tracing::warn!(origin = %config.cors_origin, error = %e, "Invalid CORS_ORIGIN, allowing any origin");
            base.allow_origin(Any)
        }
    }
}

async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
    let _ = shutdown_tx.send(());
}
