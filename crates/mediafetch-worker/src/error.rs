//! Worker error types.

use std::path::PathBuf;

use thiserror::Error;

use mediafetch_media::MediaError;

pub type WorkerResult<T> = Result<T, WorkerError>;

/// Job-fatal pipeline errors and configuration errors.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("{0}")]
    Download(#[source] MediaError),

    #[error("Failed to prepare files directory {}: {source}", path.display())]
    FilesDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pipeline task panicked: {0}")]
    Panicked(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Build from a panic payload of a joined task.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self::Panicked(message)
    }
}

/// Rejected submission. No job is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("INVALID_URL")]
    InvalidUrl,
}
