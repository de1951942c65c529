//! Health check handlers.

use std::path::Path;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use mediafetch_media::locate_tool;

use crate::state::AppState;

/// Health check endpoint (liveness probe).
pub async fn health() -> &'static str {
    "OK"
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub version: String,
    pub jobs: usize,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub yt_dlp: CheckStatus,
    pub ffmpeg: CheckStatus,
    pub files_dir: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckStatus {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(msg.into()),
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

fn check_tool(program: &str) -> CheckStatus {
    match locate_tool(program) {
        Ok(_) => CheckStatus::ok(),
        Err(e) => CheckStatus::error(e.to_string()),
    }
}

async fn check_files_dir(dir: &Path) -> CheckStatus {
    let dir = dir.to_path_buf();
    // Scratch file is removed when dropped
    let attempt = tokio::task::spawn_blocking(move || tempfile::tempfile_in(&dir)).await;
    match attempt {
        Ok(Ok(_)) => CheckStatus::ok(),
        Ok(Err(e)) => CheckStatus::error(format!("not writable: {}", e)),
        Err(e) => CheckStatus::error(e.to_string()),
    }
}

/// Readiness check endpoint (readiness probe).
/// Checks that the external tools resolve and the files directory is usable.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let fetch = state.fetch_config();

    let checks = ReadinessChecks {
        yt_dlp: check_tool(&fetch.yt_dlp_bin),
        ffmpeg: check_tool(&fetch.ffmpeg_bin),
        files_dir: check_files_dir(&fetch.files_dir).await,
    };
    let all_ok = checks.yt_dlp.is_ok() && checks.ffmpeg.is_ok() && checks.files_dir.is_ok();

    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        jobs: state.controller.store().len().await,
        checks,
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
