//! Per-job log events.
//!
//! All events of a job go through [`JobLogger`] so they share the `job_id`
//! field and can be filtered together regardless of which task emits them.

use std::fmt::Display;
use std::path::Path;

use tracing::{error, info, warn};

use mediafetch_models::JobId;

/// Emits the lifecycle events of one fetch job.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
}

impl JobLogger {
    pub fn new(job_id: &JobId) -> Self {
        Self {
            job_id: job_id.to_string(),
        }
    }

    /// The job moved to `running`.
    pub fn started(&self, url: &str) {
        info!(job_id = %self.job_id, url = %url, "Fetch started");
    }

    /// A soft step failed; the job carries on without its result.
    pub fn step_degraded(&self, step: &'static str, err: &dyn Display) {
        warn!(job_id = %self.job_id, step, "Step degraded: {}", err);
    }

    pub fn artifact_saved(&self, kind: &'static str, path: &Path) {
        info!(job_id = %self.job_id, kind, path = %path.display(), "Artifact saved");
    }

    /// The job reached `done`.
    pub fn done(&self, video_url: &str) {
        info!(job_id = %self.job_id, video_url = %video_url, "Fetch done");
    }

    /// The job reached `failed`.
    pub fn failed(&self, message: &str) {
        error!(job_id = %self.job_id, "Fetch failed: {}", message);
    }

    /// The job record could not be updated as expected.
    pub fn record_error(&self, message: &str) {
        error!(job_id = %self.job_id, "Job record error: {}", message);
    }
}
