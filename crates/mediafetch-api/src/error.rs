//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use mediafetch_worker::SubmitError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Job not found")]
    JobNotFound,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::JobNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::InvalidUrl => ApiError::InvalidUrl,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Bodies are part of the polling contract, not free-form details.
        let body = match self {
            ApiError::InvalidUrl => json!({ "error": "INVALID_URL" }),
            ApiError::JobNotFound => json!({ "status": "not_found" }),
        };

        (status, Json(body)).into_response()
    }
}
