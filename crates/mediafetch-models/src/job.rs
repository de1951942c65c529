//! Job definitions and lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a job.
///
/// Rendered as 32 lowercase hex characters so it can double as a file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Job processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is registered but the pipeline has not started
    #[default]
    Queued,
    /// Pipeline is executing
    Running,
    /// Pipeline finished and the video is available
    Done,
    /// Pipeline aborted
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Queued, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Done)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid job transition {from} -> {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Options accepted with a submission.
///
/// A missing `options` object means "everything on" (see [`Default`]), while
/// a provided object treats each absent flag as `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOptions {
    /// Derive descriptive text from the probed metadata
    #[serde(default)]
    pub extract_text: bool,
    /// Extract an AAC audio track next to the video
    #[serde(default)]
    pub audio_only: bool,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            extract_text: true,
            audio_only: true,
        }
    }
}

/// Width/height of the fetched media, when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaDimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl MediaDimensions {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// Results of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobOutcome {
    pub video_url: String,
    pub audio_url: String,
    pub text: String,
    pub meta: MediaDimensions,
}

/// A media fetch job record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// URL submitted by the caller
    pub source_url: String,

    /// Options the job runs with
    pub options: JobOptions,

    /// Lifecycle status
    pub status: JobStatus,

    /// Public URL of the downloaded video; empty unless done
    #[serde(default)]
    pub video_url: String,

    /// Public URL of the extracted audio; empty unless extracted
    #[serde(default)]
    pub audio_url: String,

    /// Derived text; never absent
    #[serde(default)]
    pub text: String,

    /// Media dimensions
    #[serde(default)]
    pub meta: MediaDimensions,

    /// Failure reason, set only when failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new queued job.
    pub fn new(id: JobId, source_url: impl Into<String>, options: JobOptions) -> Self {
        let now = Utc::now();
        Self {
            id,
            source_url: source_url.into(),
            options,
            status: JobStatus::Queued,
            video_url: String::new(),
            audio_url: String::new(),
            text: String::new(),
            meta: MediaDimensions::default(),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark the job as running.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(JobStatus::Running)
    }

    /// Mark the job as done with its final results.
    pub fn complete(&mut self, outcome: JobOutcome) -> Result<(), TransitionError> {
        self.transition(JobStatus::Done)?;
        self.video_url = outcome.video_url;
        self.audio_url = outcome.audio_url;
        self.text = outcome.text;
        self.meta = outcome.meta;
        Ok(())
    }

    /// Mark the job as failed. Text computed so far is kept.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Failed)?;
        self.error = Some(error.into());
        self.video_url.clear();
        self.audio_url.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::new(JobId::new(), "https://example.com/v", JobOptions::default())
    }

    #[test]
    fn test_job_id_is_hex() {
        let id = JobId::new();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut job = job();
        assert_eq!(job.status, JobStatus::Queued);
        job.start().unwrap();
        job.complete(JobOutcome {
            video_url: "http://h/files/a.mp4".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.video_url, "http://h/files/a.mp4");
        assert!(job.error.is_none());
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut job = job();
        job.start().unwrap();
        job.fail("boom").unwrap();

        let err = job.complete(JobOutcome::default()).unwrap_err();
        assert_eq!(err.from, JobStatus::Failed);
        assert_eq!(err.to, JobStatus::Done);
        assert!(job.start().is_err());
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_cannot_skip_running() {
        let mut job = job();
        assert!(job.complete(JobOutcome::default()).is_err());
        assert!(job.fail("x").is_err());
        assert_eq!(job.status, JobStatus::Queued);
    }

    #[test]
    fn test_fail_keeps_text() {
        let mut job = job();
        job.start().unwrap();
        job.text = "partial".into();
        job.fail("download failed").unwrap();
        assert_eq!(job.text, "partial");
        assert!(job.video_url.is_empty());
    }

    #[test]
    fn test_options_defaults() {
        assert_eq!(
            JobOptions::default(),
            JobOptions {
                extract_text: true,
                audio_only: true
            }
        );

        let provided: JobOptions = serde_json::from_str(r#"{"extractText":true}"#).unwrap();
        assert!(provided.extract_text);
        assert!(!provided.audio_only);
    }

    #[test]
    fn test_dimensions_serialize_empty_object() {
        let json = serde_json::to_string(&MediaDimensions::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
