//! Job and pipeline metrics.

use metrics::{counter, gauge, histogram};

use mediafetch_models::JobStatus;

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_SUBMITTED_TOTAL: &str = "mediafetch_jobs_submitted_total";
    pub const JOBS_FINISHED_TOTAL: &str = "mediafetch_jobs_finished_total";
    pub const JOBS_TRACKED: &str = "mediafetch_jobs_tracked";
    pub const STEP_DURATION_SECONDS: &str = "mediafetch_step_duration_seconds";
    pub const STEP_DEGRADED_TOTAL: &str = "mediafetch_step_degraded_total";
}

/// Record a new submission.
pub fn record_job_submitted(tracked: usize) {
    counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);
    gauge!(names::JOBS_TRACKED).set(tracked as f64);
}

/// Record a job reaching a terminal state.
pub fn record_job_finished(status: JobStatus) {
    counter!(names::JOBS_FINISHED_TOTAL, "status" => status.as_str()).increment(1);
}

/// Record how long a pipeline step took.
pub fn record_step_duration(step: &'static str, duration_secs: f64) {
    histogram!(names::STEP_DURATION_SECONDS, "step" => step).record(duration_secs);
}

/// Record a step that failed softly.
pub fn record_step_degraded(step: &'static str) {
    counter!(names::STEP_DEGRADED_TOTAL, "step" => step).increment(1);
}
