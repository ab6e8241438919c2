use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a load invocation. None of them are retried.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("memory reservation of {requested_mb} MiB failed: {source}")]
    MemoryExhausted {
        requested_mb: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("scratch file I/O failed on {}: {source}", path.display())]
    ScratchIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("load unit did not run to completion: {0}")]
    UnitAborted(#[from] tokio::task::JoinError),
}
