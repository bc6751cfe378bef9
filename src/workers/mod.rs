pub mod dashboard_refresh;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::config::RefreshConfig;
use crate::services::dashboard_service::DashboardService;

/// Upper bound for one worker invocation; a refresh fans out over every map.
const WORKER_TIMEOUT: Duration = Duration::from_secs(600);

/// Drain period before scheduler shutdown to let in-flight tasks complete.
#[cfg(test)]
const DRAIN_TIMEOUT: Duration = Duration::from_millis(10);
#[cfg(not(test))]
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerName {
    DashboardRefresh,
}

impl WorkerName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DashboardRefresh => "dashboard_refresh",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub name: WorkerName,
    pub cron: String,
    pub enabled: bool,
}

pub struct WorkerManager {
    service: Arc<DashboardService>,
    shutdown_rx: broadcast::Receiver<()>,
    config: RefreshConfig,
}

impl WorkerManager {
    pub fn new(
        service: Arc<DashboardService>,
        shutdown_rx: broadcast::Receiver<()>,
        config: &RefreshConfig,
    ) -> Self {
        Self {
            service,
            shutdown_rx,
            config: config.clone(),
        }
    }

    /// Single source of truth for all planned jobs and their cron schedules.
    pub fn planned_jobs(&self) -> Vec<JobSpec> {
        vec![JobSpec {
            name: WorkerName::DashboardRefresh,
            cron: self.config.cron.clone(),
            enabled: self.config.enabled,
        }]
    }

    /// Start the worker scheduler. Returns an error if the scheduler cannot be created or started.
    pub async fn start(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.planned_jobs().iter().all(|j| !j.enabled) {
            tracing::info!("No workers enabled; skipping scheduler startup");
            return Ok(());
        }

        let mut scheduler = JobScheduler::new().await?;

        self.register_jobs(&scheduler).await;

        scheduler.start().await?;

        tracing::info!("Worker manager started");
        let _ = self.shutdown_rx.recv().await;

        tracing::info!(
            "Worker manager shutting down, draining for {}s",
            DRAIN_TIMEOUT.as_secs()
        );
        tokio::time::sleep(DRAIN_TIMEOUT).await;
        let _ = scheduler.shutdown().await;
        Ok(())
    }

    async fn register_jobs(&self, scheduler: &JobScheduler) {
        for job_spec in self.planned_jobs() {
            if !job_spec.enabled {
                tracing::info!(worker = job_spec.name.as_str(), "Skipping disabled worker");
                continue;
            }

            let name = job_spec.name.as_str();
            match job_spec.name {
                WorkerName::DashboardRefresh => {
                    let service = self.service.clone();
                    add_job(scheduler, &job_spec.cron, name, move || {
                        let service = service.clone();
                        async move {
                            dashboard_refresh::run(&service).await;
                        }
                    })
                    .await;
                }
            }
            tracing::info!(worker = name, cron = %job_spec.cron, "Registered worker");
        }
    }
}

/// Add a job to the scheduler with an overlap guard and timeout wrapper.
async fn add_job<Fut, F>(scheduler: &JobScheduler, cron: &str, name: &'static str, mut run: F)
where
    F: FnMut() -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let running = Arc::new(AtomicBool::new(false));

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let guard = running.clone();

        if guard
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!(
                worker = name,
                "Skipping worker invocation: previous run still in progress"
            );
            return Box::pin(async {});
        }

        let fut = run();
        Box::pin(async move {
            if tokio::time::timeout(WORKER_TIMEOUT, fut).await.is_err() {
                tracing::error!(
                    worker = name,
                    timeout_secs = WORKER_TIMEOUT.as_secs(),
                    "Worker timed out"
                );
            }
            guard.store(false, Ordering::SeqCst);
        })
    });

    match job {
        Ok(job) => {
            if let Err(err) = scheduler.add(job).await {
                tracing::error!(error = %err, cron, worker = name, "Failed to add worker job");
            }
        }
        Err(err) => tracing::error!(error = %err, cron, worker = name, "Failed to create worker job"),
    }
}
