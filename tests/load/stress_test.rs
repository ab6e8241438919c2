#![cfg(test)]
//! Stress suite for the load controller at production settings:
//! - every core burning with the default PBKDF2 cost
//! - maximum memory reservation
//! - concurrent invocations sharing one controller
//!
//! Each test checks that the deadline still bounds wall-clock time when the
//! host is fully loaded.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use synthetic_load::config::LoadConfig;
use synthetic_load::controller::LoadController;
use synthetic_load::domain::{LoadParams, MAX_MEMORY_MB};

fn production_controller(dir: &tempfile::TempDir) -> LoadController {
    LoadController::new(LoadConfig {
        scratch_path: dir.path().join("stress.txt"),
        ..LoadConfig::default()
    })
}

fn params(duration: &str, workers: &str, mem_mb: &str, io: &str) -> LoadParams {
    LoadParams {
        duration: Some(duration.to_string()),
        workers: Some(workers.to_string()),
        mem_mb: Some(mem_mb.to_string()),
        io: Some(io.to_string()),
    }
}

/// Test: All cores at default derivation cost
///
/// One derivation may overshoot the deadline, so allow a second of slack.
#[tokio::test(flavor = "multi_thread")]
#[ignore] // Ignore by default as this is a slow test
async fn test_all_cores_respect_deadline() {
    let dir = tempfile::tempdir().unwrap();
    let controller = production_controller(&dir);
    let cores = controller.processors().to_string();

    let started = Instant::now();
    let report = controller
        .perform(&params("5", &cores, "0", "1"))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    println!("{} workers ran for {:?}", report.workers, elapsed);

    assert_eq!(report.workers, controller.processors());
    assert!(elapsed >= Duration::from_secs(5));
    assert!(
        elapsed < Duration::from_secs(6),
        "deadline overshoot too large: {:?}",
        elapsed
    );
    assert!(!dir.path().join("stress.txt").exists());
}

/// Test: Maximum memory reservation
#[tokio::test(flavor = "multi_thread")]
#[ignore] // Ignore by default as this is a slow test
async fn test_maximum_memory_reservation() {
    let dir = tempfile::tempdir().unwrap();
    let controller = production_controller(&dir);

    let report = controller
        .perform(&params("2", "1", "100000", "0"))
        .await
        .unwrap();

    assert_eq!(report.mem_mb, MAX_MEMORY_MB);
    assert!(report.ok);
}

/// Test: Concurrent invocations
///
/// Invocations share nothing but the controller's settings, so several
/// overlapping requests all finish near their own deadlines.
#[tokio::test(flavor = "multi_thread")]
#[ignore] // Ignore by default as this is a slow test
async fn test_concurrent_invocations() {
    let dir = tempfile::tempdir().unwrap();
    let controller = Arc::new(production_controller(&dir));

    let started = Instant::now();
    let mut invocations = JoinSet::new();
    for _ in 0..4 {
        let controller = Arc::clone(&controller);
        invocations.spawn(async move { controller.perform(&params("3", "1", "16", "0")).await });
    }

    while let Some(outcome) = invocations.join_next().await {
        let report = outcome.unwrap().unwrap();
        assert_eq!(report.seconds, 3);
        assert_eq!(report.mem_mb, 16);
    }

    let elapsed = started.elapsed();
    assert!(
        elapsed < Duration::from_secs(5),
        "concurrent invocations took {:?}",
        elapsed
    );
}
