//! The external tools the fetch pipeline drives.

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::audio::extract_audio_command;
use crate::command::ProcessRunner;
use crate::download::{download_args, TRANSFER_MAX_OUTPUT_BYTES};
use crate::error::{MediaError, MediaResult};
use crate::probe::{metadata_args, MediaMetadata, METADATA_MAX_OUTPUT_BYTES};

/// Operations the fetch pipeline needs from the outside world.
#[async_trait]
pub trait MediaTools: Send + Sync {
    /// Probe `url` for metadata without downloading.
    async fn probe_metadata(&self, url: &str) -> MediaResult<MediaMetadata>;

    /// Download the preferred stream of `url` to `output`.
    async fn download_video(&self, url: &str, output: &Path) -> MediaResult<()>;

    /// Extract an AAC audio track from `video` into `output`.
    async fn extract_audio(&self, video: &Path, output: &Path) -> MediaResult<()>;
}

/// [`MediaTools`] backed by the `yt-dlp` and `ffmpeg` binaries.
#[derive(Debug, Clone)]
pub struct CliMediaTools {
    yt_dlp: String,
    ffmpeg: String,
    probe_runner: ProcessRunner,
    transfer_runner: ProcessRunner,
}

impl Default for CliMediaTools {
    fn default() -> Self {
        Self::new("yt-dlp", "ffmpeg")
    }
}

impl CliMediaTools {
    /// Create tools invoking the given binaries with the default output ceilings.
    pub fn new(yt_dlp: impl Into<String>, ffmpeg: impl Into<String>) -> Self {
        Self {
            yt_dlp: yt_dlp.into(),
            ffmpeg: ffmpeg.into(),
            probe_runner: ProcessRunner::new(METADATA_MAX_OUTPUT_BYTES),
            transfer_runner: ProcessRunner::new(TRANSFER_MAX_OUTPUT_BYTES),
        }
    }

    /// Override the output ceilings.
    pub fn with_limits(mut self, probe_max_bytes: usize, transfer_max_bytes: usize) -> Self {
        self.probe_runner = ProcessRunner::new(probe_max_bytes);
        self.transfer_runner = ProcessRunner::new(transfer_max_bytes);
        self
    }
}

#[async_trait]
impl MediaTools for CliMediaTools {
    async fn probe_metadata(&self, url: &str) -> MediaResult<MediaMetadata> {
        let output = self.probe_runner.run(&self.yt_dlp, metadata_args(url)).await?;
        MediaMetadata::parse(&output.stdout)
    }

    async fn download_video(&self, url: &str, output: &Path) -> MediaResult<()> {
        info!("Downloading video from {} to {}", url, output.display());

        self.transfer_runner
            .run(&self.yt_dlp, download_args(url, output))
            .await
            .map_err(|e| match e {
                MediaError::ProcessFailed { message, .. } => MediaError::download_failed(message),
                other => other,
            })?;

        if !tokio::fs::try_exists(output).await? {
            return Err(MediaError::OutputMissing(output.to_path_buf()));
        }

        let size = tokio::fs::metadata(output).await?.len();
        info!(
            output = %output.display(),
            size_mb = size as f64 / (1024.0 * 1024.0),
            "Downloaded video successfully"
        );
        Ok(())
    }

    async fn extract_audio(&self, video: &Path, output: &Path) -> MediaResult<()> {
        let cmd = extract_audio_command(video, output);
        debug!("Extracting audio from {} to {}", video.display(), output.display());
        self.transfer_runner.run(&self.ffmpeg, cmd.build_args()).await?;
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use super::*;

    /// Write an executable shell script standing in for a tool.
    fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_probe_parses_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = fake_tool(
            dir.path(),
            "yt-dlp",
            r#"echo '{"title":"T","description":"D","width":640,"height":360}'"#,
        );
        let tools = CliMediaTools::new(yt_dlp.to_string_lossy(), "ffmpeg");

        let meta = tools.probe_metadata("https://example.com/v").await.unwrap();
        assert_eq!(meta.title(), Some("T"));
        assert_eq!(meta.dimensions().width, Some(640));
    }

    #[tokio::test]
    async fn test_download_failure_is_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = fake_tool(dir.path(), "yt-dlp", "echo 'ERROR: Unsupported URL' >&2; exit 1");
        let tools = CliMediaTools::new(yt_dlp.to_string_lossy(), "ffmpeg");

        let err = tools
            .download_video("https://example.com/v", &dir.path().join("a.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::DownloadFailed { .. }));
        assert!(err.to_string().contains("Unsupported URL"));
    }

    #[tokio::test]
    async fn test_download_requires_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let yt_dlp = fake_tool(dir.path(), "yt-dlp", "exit 0");
        let tools = CliMediaTools::new(yt_dlp.to_string_lossy(), "ffmpeg");

        let err = tools
            .download_video("https://example.com/v", &dir.path().join("a.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::OutputMissing(_)));
    }

    #[tokio::test]
    async fn test_download_writes_to_output_argument() {
        let dir = tempfile::tempdir().unwrap();
        // The output path follows "-o"; write something there.
        let yt_dlp = fake_tool(
            dir.path(),
            "yt-dlp",
            r#"while [ "$1" != "-o" ]; do shift; done; echo data > "$2""#,
        );
        let tools = CliMediaTools::new(yt_dlp.to_string_lossy(), "ffmpeg");
        let output = dir.path().join("a.mp4");

        tools
            .download_video("https://example.com/v", &output)
            .await
            .unwrap();
        assert!(output.exists());
    }
}
