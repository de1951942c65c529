//! Subprocess runner and FFmpeg command builder.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Default output ceiling (1 MiB per stream).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Captured output of a successful process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs one external program to completion, capturing its output.
///
/// stdout and stderr are each bounded by `max_output_bytes`; a process that
/// writes more is killed and reported as [`MediaError::OutputLimitExceeded`].
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    max_output_bytes: usize,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OUTPUT_BYTES)
    }
}

impl ProcessRunner {
    /// Create a runner with the given per-stream output ceiling.
    pub fn new(max_output_bytes: usize) -> Self {
        Self { max_output_bytes }
    }

    /// Run `program` with `args` and wait for it to exit.
    pub async fn run<I, S>(&self, program: &str, args: I) -> MediaResult<ProcessOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_os_string())
            .collect();

        debug!(
            "Running: {} {}",
            program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut child = match Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MediaError::ToolNotFound(program.to_string()));
            }
            Err(e) => {
                return Err(MediaError::Spawn {
                    program: program.to_string(),
                    source: e,
                });
            }
        };

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::internal("stdout not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MediaError::internal("stderr not captured"))?;

        let limit = self.max_output_bytes;
        let mut out_buf = Vec::new();
        let mut err_buf = Vec::new();
        let mut out_chunk = [0u8; READ_CHUNK_SIZE];
        let mut err_chunk = [0u8; READ_CHUNK_SIZE];
        let mut out_done = false;
        let mut err_done = false;

        // Drain both pipes together so a chatty stream can't stall the other.
        while !(out_done && err_done) {
            tokio::select! {
                read = stdout.read(&mut out_chunk), if !out_done => {
                    match read? {
                        0 => out_done = true,
                        n => out_buf.extend_from_slice(&out_chunk[..n]),
                    }
                }
                read = stderr.read(&mut err_chunk), if !err_done => {
                    match read? {
                        0 => err_done = true,
                        n => err_buf.extend_from_slice(&err_chunk[..n]),
                    }
                }
            }

            if out_buf.len() > limit || err_buf.len() > limit {
                warn!("{} exceeded output limit of {} bytes, killing process", program, limit);
                let _ = child.kill().await;
                out_buf.truncate(limit);
                err_buf.truncate(limit);
                return Err(MediaError::OutputLimitExceeded {
                    program: program.to_string(),
                    limit,
                    stdout: String::from_utf8_lossy(&out_buf).into_owned(),
                    stderr: String::from_utf8_lossy(&err_buf).into_owned(),
                });
            }
        }

        let status = child.wait().await?;
        let stdout = String::from_utf8_lossy(&out_buf).into_owned();
        let stderr = String::from_utf8_lossy(&err_buf).into_owned();

        if status.success() {
            Ok(ProcessOutput { stdout, stderr })
        } else {
            debug!("{} stderr: {}", program, stderr);
            Err(MediaError::process_failed(
                program,
                status.code(),
                stdout,
                stderr,
            ))
        }
    }
}

/// Builder for FFmpeg commands.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Drop the video stream.
    pub fn no_video(self) -> Self {
        self.output_arg("-vn")
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-acodec").output_arg(codec)
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());

        args.extend(self.output_args.clone());

        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Resolve a tool on `PATH`.
pub fn locate_tool(program: &str) -> MediaResult<PathBuf> {
    which::which(program).map_err(|_| MediaError::ToolNotFound(program.to_string()))
}
