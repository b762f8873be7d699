use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors produced by a benchmark run. No variant is retried; the run is
/// abandoned on the first failure and the workspace is still removed.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("workspace {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("starting engine {path}: {source}")]
    Process {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing first output record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("output file has no complete first line")]
    EmptyOutput,

    #[error("engine did not complete within {0:?}")]
    Timeout(Duration),

    #[error("input file is empty; percent size change is undefined")]
    EmptyInput,

    #[error("completion monitor terminated unexpectedly")]
    MonitorDied,
}

impl BenchError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
