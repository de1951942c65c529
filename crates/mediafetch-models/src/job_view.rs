//! Polling view of a job.
//!
//! The shape depends on the status: queued/running jobs expose only their
//! status, terminal jobs expose their results.

use serde::{Deserialize, Serialize};

use crate::job::{Job, JobStatus, MediaDimensions};

/// Job view returned by status queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobView {
    Queued,
    Running,
    #[serde(rename_all = "camelCase")]
    Done {
        video_url: String,
        audio_url: String,
        text: String,
        meta: MediaDimensions,
    },
    #[serde(rename_all = "camelCase")]
    Failed {
        message: String,
        audio_url: String,
        text: String,
    },
    NotFound,
}

impl JobView {
    /// Whether the view refers to an existing job.
    pub fn is_found(&self) -> bool {
        !matches!(self, JobView::NotFound)
    }

    /// Status of the viewed job, if it exists.
    pub fn status(&self) -> Option<JobStatus> {
        match self {
            JobView::Queued => Some(JobStatus::Queued),
            JobView::Running => Some(JobStatus::Running),
            JobView::Done { .. } => Some(JobStatus::Done),
            JobView::Failed { .. } => Some(JobStatus::Failed),
            JobView::NotFound => None,
        }
    }
}

impl From<&Job> for JobView {
    fn from(job: &Job) -> Self {
        match job.status {
            JobStatus::Queued => JobView::Queued,
            JobStatus::Running => JobView::Running,
            JobStatus::Done => JobView::Done {
                video_url: job.video_url.clone(),
                audio_url: job.audio_url.clone(),
                text: job.text.clone(),
                meta: job.meta,
            },
            JobStatus::Failed => JobView::Failed {
                message: job.error.clone().unwrap_or_else(|| "failed".to_string()),
                audio_url: job.audio_url.clone(),
                text: job.text.clone(),
            },
        }
    }
}

impl From<Option<&Job>> for JobView {
    fn from(job: Option<&Job>) -> Self {
        job.map(JobView::from).unwrap_or(JobView::NotFound)
    }
}
