use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the report pipeline.
///
/// Missing data inside a log is never an error: incomplete blocks are dropped
/// and empty series are skipped with a warning. Only the conditions below stop
/// the current operation.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed plan file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("chart rendering failed: {0}")]
    Plot(String),

    #[error("a save path must be provided when saving is requested")]
    MissingSavePath,

    #[error("a baseline time is required to compute {0}")]
    MissingBaseline(&'static str),
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io { path: path.into(), source }
    }
}
