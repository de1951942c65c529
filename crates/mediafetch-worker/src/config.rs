//! Fetch pipeline configuration.

use std::path::{Path, PathBuf};

use mediafetch_media::download::TRANSFER_MAX_OUTPUT_BYTES;
use mediafetch_media::probe::METADATA_MAX_OUTPUT_BYTES;
use mediafetch_models::JobId;
use url::Url;

use crate::error::{WorkerError, WorkerResult};

/// Path segment under the public base where artifacts are served.
pub const FILES_PATH_SEGMENT: &str = "files";

/// Configuration for the media fetch pipeline.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory downloaded artifacts are written to
    pub files_dir: PathBuf,
    /// Externally reachable URL prefix, without trailing slash
    pub public_base: String,
    /// yt-dlp binary
    pub yt_dlp_bin: String,
    /// FFmpeg binary
    pub ffmpeg_bin: String,
    /// Output ceiling for the metadata probe
    pub metadata_max_output: usize,
    /// Output ceiling for downloads and transcodes
    pub transfer_max_output: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            files_dir: PathBuf::from("./public/files"),
            public_base: "http://localhost:8080".to_string(),
            yt_dlp_bin: "yt-dlp".to_string(),
            ffmpeg_bin: "ffmpeg".to_string(),
            metadata_max_output: METADATA_MAX_OUTPUT_BYTES,
            transfer_max_output: TRANSFER_MAX_OUTPUT_BYTES,
        }
    }
}

impl FetchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);

        Self {
            files_dir: std::env::var("FILES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public/files")),
            public_base: std::env::var("PUBLIC_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            yt_dlp_bin: std::env::var("YT_DLP_BIN").unwrap_or_else(|_| "yt-dlp".to_string()),
            ffmpeg_bin: std::env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()),
            ..Self::default()
        }
    }

    /// Set the public base, dropping any trailing slash.
    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        self.public_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the files directory.
    pub fn with_files_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.files_dir = dir.into();
        self
    }

    /// Check that the public base is an absolute http(s) URL.
    pub fn validate(&self) -> WorkerResult<()> {
        let url = Url::parse(&self.public_base).map_err(|e| {
            WorkerError::config_error(format!("PUBLIC_BASE {:?} is not a URL: {}", self.public_base, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(WorkerError::config_error(format!(
                "PUBLIC_BASE must be http(s), got {}",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Where the video of a job is downloaded to.
    pub fn video_path(&self, job_id: &JobId) -> PathBuf {
        self.files_dir.join(format!("{}.mp4", job_id))
    }

    /// Where the extracted audio of a job is written to.
    pub fn audio_path(&self, job_id: &JobId) -> PathBuf {
        self.files_dir.join(format!("{}.m4a", job_id))
    }

    /// Public URL of an artifact: `<base>/files/<file name>`.
    pub fn public_url(&self, path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}/{}/{}", self.public_base, FILES_PATH_SEGMENT, name)
    }
}
