//! Audio track extraction with FFmpeg.

use std::path::Path;

use crate::command::FfmpegCommand;

/// Build the command that re-encodes the audio of `video` into an AAC/M4A
/// file at `output`, overwriting it if present.
pub fn extract_audio_command(video: impl AsRef<Path>, output: impl AsRef<Path>) -> FfmpegCommand {
    FfmpegCommand::new(video, output).no_video().audio_codec("aac")
}
