//! Media fetch pipeline.
//!
//! One run turns a `(url, options)` pair into a [`JobOutcome`]:
//!
//! 1. metadata probe (soft)
//! 2. video download (fatal)
//! 3. audio extraction, if requested (soft)
//! 4. text derivation, if requested
//!
//! Soft steps report [`StepOutcome::Degraded`] and the run continues; only the
//! download step (and preparing the files directory) can fail the job.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use mediafetch_media::{derive_text, MediaError, MediaMetadata, MediaTools};
use mediafetch_models::{JobId, JobOptions, JobOutcome};

use crate::config::FetchConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::metrics;

/// Result of a step whose failure does not fail the job.
#[derive(Debug)]
pub enum StepOutcome<T> {
    Completed(T),
    Degraded(MediaError),
}

impl<T> StepOutcome<T> {
    fn from_result(step: &'static str, result: Result<T, MediaError>) -> Self {
        match result {
            Ok(value) => StepOutcome::Completed(value),
            Err(e) => {
                metrics::record_step_degraded(step);
                StepOutcome::Degraded(e)
            }
        }
    }
}

/// Runs the fetch steps for one job at a time.
pub struct MediaPipeline {
    config: FetchConfig,
    tools: Arc<dyn MediaTools>,
}

impl MediaPipeline {
    pub fn new(config: FetchConfig, tools: Arc<dyn MediaTools>) -> Self {
        Self { config, tools }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Run every step for `job_id` in order.
    pub async fn run(&self, job_id: &JobId, url: &str, options: JobOptions) -> WorkerResult<JobOutcome> {
        let logger = JobLogger::new(job_id);

        self.prepare_files_dir().await?;

        let metadata = match self.probe(url).await {
            StepOutcome::Completed(meta) => meta,
            StepOutcome::Degraded(e) => {
                logger.step_degraded("probe", &e);
                MediaMetadata::default()
            }
        };

        let video_path = self.config.video_path(job_id);
        self.download(url, &video_path).await?;
        logger.artifact_saved("video", &video_path);

        let audio_url = if options.audio_only {
            match self.extract_audio(&video_path, &self.config.audio_path(job_id)).await {
                StepOutcome::Completed(path) => {
                    logger.artifact_saved("audio", &path);
                    self.config.public_url(&path)
                }
                StepOutcome::Degraded(e) => {
                    logger.step_degraded("audio", &e);
                    String::new()
                }
            }
        } else {
            String::new()
        };

        let text = if options.extract_text {
            derive_text(&metadata)
        } else {
            String::new()
        };

        Ok(JobOutcome {
            video_url: self.config.public_url(&video_path),
            audio_url,
            text,
            meta: metadata.dimensions(),
        })
    }

    async fn prepare_files_dir(&self) -> WorkerResult<()> {
        tokio::fs::create_dir_all(&self.config.files_dir)
            .await
            .map_err(|source| WorkerError::FilesDir {
                path: self.config.files_dir.clone(),
                source,
            })
    }

    async fn probe(&self, url: &str) -> StepOutcome<MediaMetadata> {
        let start = Instant::now();
        let result = self.tools.probe_metadata(url).await;
        metrics::record_step_duration("probe", start.elapsed().as_secs_f64());
        StepOutcome::from_result("probe", result)
    }

    async fn download(&self, url: &str, video_path: &Path) -> WorkerResult<()> {
        let start = Instant::now();
        let result = self.tools.download_video(url, video_path).await;
        metrics::record_step_duration("download", start.elapsed().as_secs_f64());
        result.map_err(WorkerError::Download)
    }

    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> StepOutcome<PathBuf> {
        let start = Instant::now();
        let result = self.tools.extract_audio(video_path, audio_path).await;
        metrics::record_step_duration("audio", start.elapsed().as_secs_f64());
        StepOutcome::from_result("audio", result.map(|()| audio_path.to_path_buf()))
    }
}
