//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while running the external media tools.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0} not found in PATH")]
    ToolNotFound(String),

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    ProcessFailed {
        message: String,
        program: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("{program} output exceeded {limit} bytes")]
    OutputLimitExceeded {
        program: String,
        limit: usize,
        stdout: String,
        stderr: String,
    },

    #[error("Download failed: {message}")]
    DownloadFailed { message: String },

    #[error("Output file not created: {0}")]
    OutputMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create a process failure error.
    ///
    /// The display message names the program, the exit status and the last
    /// non-empty stderr line.
    pub fn process_failed(
        program: impl Into<String>,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    ) -> Self {
        let program = program.into();
        let status = match exit_code {
            Some(code) => format!("status {}", code),
            None => "a signal".to_string(),
        };
        let message = match last_line(&stderr) {
            Some(line) => format!("{} exited with {}: {}", program, status, line),
            None => format!("{} exited with {}", program, status),
        };

        Self::ProcessFailed {
            message,
            program,
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().rev().map(str::trim).find(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failed_message_uses_last_stderr_line() {
        let err = MediaError::process_failed(
            "yt-dlp",
            Some(1),
            String::new(),
            "WARNING: something\nERROR: Unsupported URL\n\n".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "yt-dlp exited with status 1: ERROR: Unsupported URL"
        );
        match err {
            MediaError::ProcessFailed { stderr, .. } => assert!(stderr.contains("WARNING")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_process_failed_without_stderr() {
        let err = MediaError::process_failed("ffmpeg", None, String::new(), String::new());
        assert_eq!(err.to_string(), "ffmpeg exited with a signal");
    }
}
