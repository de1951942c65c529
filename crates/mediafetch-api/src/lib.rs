//! Axum HTTP API for the media fetch service.
//!
//! This crate provides:
//! - `POST /process` and `GET /status` over the job controller
//! - Health/readiness probes and Prometheus metrics
//! - Read-only serving of downloaded artifacts under `/files`

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
