//! Shared data models for the media fetch service.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs, their identifiers and lifecycle states
//! - Submission options
//! - The polling view returned to callers

pub mod job;
pub mod job_view;

// Re-export common types
pub use job::{Job, JobId, JobOptions, JobOutcome, JobStatus, MediaDimensions, TransitionError};
pub use job_view::JobView;
