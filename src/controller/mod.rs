pub mod cpu;
pub mod error;
pub mod io_churn;
pub mod memory;

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::{Config, LoadConfig};
use crate::domain::{Deadline, LoadParams, LoadProfile, LoadReport};

pub use cpu::BurnWorker;
pub use error::LoadError;
pub use io_churn::IoChurn;
pub use memory::MemoryReservation;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub controller: Arc<LoadController>,
}

impl AppState {
    pub fn new(cfg: Config) -> Self {
        let controller = LoadController::new(cfg.load.clone());
        Self::with_controller(cfg, controller)
    }

    pub fn with_controller(cfg: Config, controller: LoadController) -> Self {
        Self {
            cfg,
            controller: Arc::new(controller),
        }
    }
}

/// What one invocation did, beyond the wire report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub report: LoadReport,
    /// Chunks still held when every unit had joined
    pub held_chunks: usize,
    pub held_bytes: usize,
    pub elapsed: std::time::Duration,
}

/// Runs one bounded load invocation per call.
///
/// Holds nothing between invocations apart from settings and host facts
/// read once at startup.
pub struct LoadController {
    settings: LoadConfig,
    host: String,
    processors: usize,
}

impl LoadController {
    pub fn new(settings: LoadConfig) -> Self {
        let host = settings.host_name.clone().unwrap_or_else(|| {
            hostname::get()
                .map(|h| h.to_string_lossy().to_string())
                .unwrap_or_else(|_| "unknown".to_string())
        });

        Self {
            settings,
            host,
            processors: num_cpus::get(),
        }
    }

    /// Override the detected processor count, which bounds the worker count.
    pub fn with_processors(mut self, processors: usize) -> Self {
        self.processors = processors.max(1);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn processors(&self) -> usize {
        self.processors
    }

    pub fn settings(&self) -> &LoadConfig {
        &self.settings
    }

    pub fn resolve(&self, params: &LoadParams) -> LoadProfile {
        LoadProfile::resolve(params, self.processors)
    }

    /// Resolve raw parameters and run the resulting profile.
    pub async fn perform(&self, params: &LoadParams) -> Result<LoadReport, LoadError> {
        let profile = self.resolve(params);
        self.run(profile).await
    }

    /// Drive the profile until its deadline and report.
    pub async fn run(&self, profile: LoadProfile) -> Result<LoadReport, LoadError> {
        self.execute(profile).await.map(|outcome| outcome.report)
    }

    /// Like [`run`](Self::run), also returning what was held at the join.
    ///
    /// Every unit is spawned detached from the caller, so a dropped request
    /// does not stop them; they still end at the deadline and the I/O loop
    /// still removes its scratch file. The memory reservation lives in this
    /// future and is freed as soon as it completes or is dropped.
    pub async fn execute(&self, profile: LoadProfile) -> Result<LoadOutcome, LoadError> {
        let worker = BurnWorker::new(self.settings.kdf_iterations);
        info!(
            seconds = profile.duration_secs(),
            workers = profile.worker_count(),
            mem_mb = profile.memory_mb(),
            io = profile.io_enabled(),
            kdf_iterations = worker.iterations(),
            "load invocation starting"
        );

        let started = Instant::now();
        let deadline = Deadline::after(profile.duration());

        let memory_mb = profile.memory_mb();
        let reservation =
            tokio::task::spawn_blocking(move || MemoryReservation::reserve(memory_mb)).await??;

        let mut units: Vec<JoinHandle<Result<(), LoadError>>> =
            Vec::with_capacity(profile.worker_count() + 1);

        for id in 0..profile.worker_count() {
            units.push(tokio::task::spawn_blocking(move || {
                let rounds = worker.run(deadline);
                debug!(worker = id, rounds, "burn worker finished");
                Ok(())
            }));
        }

        if profile.io_enabled() {
            let churn = IoChurn::from_config(&self.settings);
            units.push(tokio::spawn(async move {
                let cycles = churn.run(deadline).await?;
                debug!(cycles, "io churn finished");
                Ok::<(), LoadError>(())
            }));
        }

        let mut failure = None;
        for outcome in join_all(units).await {
            if let Err(e) = outcome.map_err(LoadError::from).and_then(|unit| unit) {
                error!(error = %e, "load unit failed");
                failure.get_or_insert(e);
            }
        }

        let held_chunks = reservation.chunk_count();
        let held_bytes = reservation.total_bytes();
        drop(reservation);

        if let Some(e) = failure {
            return Err(e);
        }

        let elapsed = started.elapsed();
        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            held_chunks,
            held_bytes,
            "load invocation completed"
        );

        Ok(LoadOutcome {
            report: LoadReport::completed(&profile, self.host.as_str()),
            held_chunks,
            held_bytes,
            elapsed,
        })
    }

    /// Whether the directory holding the scratch file exists.
    pub async fn scratch_dir_ready(&self) -> bool {
        let dir = match self.settings.scratch_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => std::path::PathBuf::from("."),
        };
        tokio::fs::metadata(&dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}
