//! yt-dlp and FFmpeg CLI wrappers for media fetching.
//!
//! This crate provides:
//! - A subprocess runner with output capture and an output-size ceiling
//! - yt-dlp metadata probing and video download
//! - FFmpeg audio track extraction
//! - Text derivation from probed metadata
//! - The [`MediaTools`] seam used by the fetch pipeline

pub mod audio;
pub mod command;
pub mod download;
pub mod error;
pub mod probe;
pub mod text;
pub mod tools;

pub use command::{locate_tool, FfmpegCommand, ProcessOutput, ProcessRunner};
pub use error::{MediaError, MediaResult};
pub use probe::{FormatInfo, MediaMetadata};
pub use text::{derive_text, NO_TEXT_PLACEHOLDER};
pub use tools::{CliMediaTools, MediaTools};
