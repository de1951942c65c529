//! Job lifecycle controller.
//!
//! `submit` registers a queued job and hands it to a detached tokio task; the
//! caller never waits for the pipeline. The task is the only writer of its
//! job record: it performs `queued -> running`, runs the pipeline and records
//! the terminal state. Pipeline errors and panics both end in `failed`.

use std::sync::Arc;

use mediafetch_models::{Job, JobId, JobOptions, JobStatus, JobView, TransitionError};

use crate::error::{SubmitError, WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::metrics;
use crate::pipeline::MediaPipeline;
use crate::store::JobStore;

/// Creates jobs, launches their pipelines and answers status queries.
#[derive(Clone)]
pub struct JobController {
    store: Arc<JobStore>,
    pipeline: Arc<MediaPipeline>,
}

impl JobController {
    pub fn new(store: Arc<JobStore>, pipeline: Arc<MediaPipeline>) -> Self {
        Self { store, pipeline }
    }

    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    pub fn pipeline(&self) -> &Arc<MediaPipeline> {
        &self.pipeline
    }

    /// Register a job for `url` and start it in the background.
    ///
    /// Returns as soon as the record exists. An empty URL is rejected without
    /// creating anything; any other string is handed to the tools as-is.
    pub async fn submit(&self, url: &str, options: JobOptions) -> Result<JobId, SubmitError> {
        if url.is_empty() {
            return Err(SubmitError::InvalidUrl);
        }

        let job_id = self.store.create(url, options).await;
        metrics::record_job_submitted(self.store.len().await);

        tokio::spawn(run_job(
            Arc::clone(&self.store),
            Arc::clone(&self.pipeline),
            job_id.clone(),
            url.to_string(),
            options,
        ));

        Ok(job_id)
    }

    /// Current view of a job.
    pub async fn query_status(&self, job_id: &JobId) -> JobView {
        self.store.view(job_id).await
    }
}

/// Body of the detached task driving one job.
async fn run_job(
    store: Arc<JobStore>,
    pipeline: Arc<MediaPipeline>,
    job_id: JobId,
    url: String,
    options: JobOptions,
) {
    let logger = JobLogger::new(&job_id);

    match store.update(&job_id, Job::start).await {
        Some(Ok(())) => logger.started(&url),
        Some(Err(e)) => {
            logger.record_error(&format!("refusing to run: {}", e));
            return;
        }
        None => {
            logger.record_error("job record disappeared before start");
            return;
        }
    }

    // The pipeline runs in its own task so a panic surfaces as a JoinError
    // here instead of unwinding through the record bookkeeping.
    let task = {
        let pipeline = Arc::clone(&pipeline);
        let job_id = job_id.clone();
        tokio::spawn(async move { pipeline.run(&job_id, &url, options).await })
    };

    let result: WorkerResult<_> = match task.await {
        Ok(result) => result,
        Err(join_error) if join_error.is_panic() => {
            Err(WorkerError::from_panic(join_error.into_panic()))
        }
        Err(join_error) => Err(WorkerError::Panicked(join_error.to_string())),
    };

    let (status, transition) = match result {
        Ok(outcome) => {
            logger.done(&outcome.video_url);
            (
                JobStatus::Done,
                store.update(&job_id, |job| job.complete(outcome)).await,
            )
        }
        Err(e) => {
            let message = e.to_string();
            logger.failed(&message);
            (
                JobStatus::Failed,
                store.update(&job_id, |job| job.fail(message)).await,
            )
        }
    };

    match transition {
        Some(Ok(())) => metrics::record_job_finished(status),
        Some(Err(TransitionError { from, to })) => {
            logger.record_error(&format!("invalid transition {} -> {}", from, to));
        }
        None => logger.record_error("job record disappeared before completion"),
    }
}
