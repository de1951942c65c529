//! Asynchronous media fetch jobs.
//!
//! This crate provides:
//! - [`JobStore`]: the in-memory source of truth for job records
//! - [`JobController`]: submission, detached execution and status queries
//! - [`MediaPipeline`]: the probe → download → audio → text sequence for one job

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod store;

pub use config::{FetchConfig, FILES_PATH_SEGMENT};
pub use controller::JobController;
pub use error::{SubmitError, WorkerError, WorkerResult};
pub use logging::JobLogger;
pub use pipeline::{MediaPipeline, StepOutcome};
pub use store::JobStore;
