//! Application state.

use std::sync::Arc;

use mediafetch_media::{CliMediaTools, MediaTools};
use mediafetch_worker::{FetchConfig, JobController, JobStore, MediaPipeline};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub controller: JobController,
}

impl AppState {
    /// Create state driving the real yt-dlp/FFmpeg binaries.
    pub fn new(config: ApiConfig, fetch: FetchConfig) -> Self {
        let tools = CliMediaTools::new(&fetch.yt_dlp_bin, &fetch.ffmpeg_bin)
            .with_limits(fetch.metadata_max_output, fetch.transfer_max_output);
        Self::with_tools(config, fetch, Arc::new(tools))
    }

    /// Create state over an arbitrary tool implementation.
    pub fn with_tools(config: ApiConfig, fetch: FetchConfig, tools: Arc<dyn MediaTools>) -> Self {
        let store = Arc::new(JobStore::new());
        let pipeline = Arc::new(MediaPipeline::new(fetch, tools));

        Self {
            config,
            controller: JobController::new(store, pipeline),
        }
    }

    /// Pipeline configuration.
    pub fn fetch_config(&self) -> &FetchConfig {
        self.controller.pipeline().config()
    }
}
