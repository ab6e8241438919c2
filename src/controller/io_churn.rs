use rand::RngCore;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::LoadError;
use crate::config::LoadConfig;
use crate::domain::Deadline;

/// Disk churn unit: append random hex to a scratch file, read it all back, pause, repeat.
#[derive(Debug, Clone)]
pub struct IoChurn {
    path: PathBuf,
    block_bytes: usize,
    pause: Duration,
    cap_bytes: u64,
}

impl IoChurn {
    pub fn new(path: impl Into<PathBuf>, block_bytes: usize, pause: Duration, cap_bytes: u64) -> Self {
        Self {
            path: path.into(),
            block_bytes: block_bytes.max(1),
            pause,
            cap_bytes,
        }
    }

    pub fn from_config(cfg: &LoadConfig) -> Self {
        Self::new(
            cfg.scratch_path.clone(),
            cfg.io_block_bytes,
            Duration::from_millis(cfg.io_pause_ms),
            cfg.scratch_cap_bytes,
        )
    }

    #[cfg(test)]
    fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Churn until `deadline`, then remove the scratch file.
    ///
    /// Removal is attempted even when the loop failed, and its own errors are
    /// ignored. Returns the number of completed cycles.
    pub async fn run(self, deadline: Deadline) -> Result<u64, LoadError> {
        let outcome = self.churn(deadline).await;

        if let Err(e) = fs::remove_file(&self.path).await {
            debug!(path = %self.path.display(), error = %e, "scratch file cleanup skipped");
        }

        outcome
    }

    async fn churn(&self, deadline: Deadline) -> Result<u64, LoadError> {
        let mut cycles = 0u64;
        while !deadline.reached() {
            let block = random_hex_block(self.block_bytes);
            self.append(block.as_bytes()).await?;

            let contents = fs::read(&self.path).await.map_err(|e| self.io_error(e))?;
            if contents.len() as u64 > self.cap_bytes {
                fs::File::create(&self.path)
                    .await
                    .map_err(|e| self.io_error(e))?;
                debug!(path = %self.path.display(), size = contents.len(), "scratch file truncated");
            }

            tokio::time::sleep(self.pause).await;
            cycles += 1;
        }
        Ok(cycles)
    }

    async fn append(&self, bytes: &[u8]) -> Result<(), LoadError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(bytes).await.map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> LoadError {
        LoadError::ScratchIo {
            path: self.path.clone(),
            source,
        }
    }
}

fn random_hex_block(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn churn_in(dir: &tempfile::TempDir, cap_bytes: u64) -> IoChurn {
        IoChurn::new(dir.path().join("stress.txt"), 64, Duration::from_millis(5), cap_bytes)
    }

    #[test]
    fn test_random_block_is_hex_of_requested_size() {
        let block = random_hex_block(16);
        assert_eq!(block.len(), 32);
        assert!(block.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_scratch_file_removed_after_run() {
        let dir = tempfile::tempdir().unwrap();
        let churn = churn_in(&dir, u64::MAX);
        let path = churn.path().to_path_buf();

        let started = Instant::now();
        let cycles = churn.run(Deadline::after(Duration::from_millis(200))).await.unwrap();

        assert!(cycles > 0);
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_file_exists_while_churning() {
        let dir = tempfile::tempdir().unwrap();
        let churn = churn_in(&dir, u64::MAX);
        let path = churn.path().to_path_buf();

        let handle = tokio::spawn(churn.run(Deadline::after(Duration::from_millis(400))));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(path.exists());

        handle.await.unwrap().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_growth_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stress.txt");
        // Each append writes 128 hex chars, so the file passes 256 bytes on every third cycle.
        let churn = IoChurn::new(&path, 64, Duration::ZERO, 256);

        let cycles = churn.churn(Deadline::after(Duration::from_millis(100))).await.unwrap();

        assert!(cycles > 3);
        let size = std::fs::metadata(&path).unwrap().len();
        assert!(size <= 256);
    }

    #[tokio::test]
    async fn test_unwritable_path_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let churn = IoChurn::new(
            dir.path().join("missing").join("stress.txt"),
            64,
            Duration::from_millis(5),
            u64::MAX,
        );

        let result = churn.run(Deadline::after(Duration::from_millis(50))).await;
        assert!(matches!(result, Err(LoadError::ScratchIo { .. })));
    }
}
