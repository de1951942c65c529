//! Video download using yt-dlp.

use std::path::Path;

/// Output ceiling for yt-dlp and FFmpeg transfers (50 MiB).
pub const TRANSFER_MAX_OUTPUT_BYTES: usize = 50 * 1024 * 1024;

/// Format selection: MP4 video+audio, else a single MP4, else anything.
pub const FORMAT_SELECTOR: &str = "bv*[ext=mp4]+ba/b[ext=mp4]/best";

/// Format preference: up to 1080p, H.264 first.
pub const FORMAT_SORT: &str = "res:1080,codec:h264";

/// Arguments for downloading `url` into `output_path`.
pub fn download_args(url: &str, output_path: impl AsRef<Path>) -> Vec<String> {
    vec![
        "-f".to_string(),
        FORMAT_SELECTOR.to_string(),
        "-S".to_string(),
        FORMAT_SORT.to_string(),
        "--merge-output-format".to_string(),
        "mp4".to_string(),
        "-o".to_string(),
        output_path.as_ref().to_string_lossy().to_string(),
        url.to_string(),
    ]
}
