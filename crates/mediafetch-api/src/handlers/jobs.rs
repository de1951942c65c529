//! Job submission and status polling handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use mediafetch_models::{JobId, JobOptions, JobView};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Types
// ============================================================================

/// Response to a successful submission.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub job_id: String,
}

/// Query parameters for the status endpoint.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(rename = "jobId")]
    pub job_id: Option<String>,
}

/// A parsed `POST /process` body.
#[derive(Debug, PartialEq, Eq)]
pub struct ProcessRequest {
    pub url: String,
    pub options: JobOptions,
}

impl ProcessRequest {
    /// Extract the URL and options from a loosely-typed JSON body.
    ///
    /// `url` must be a string. A falsy or missing `options` means the default
    /// options; otherwise each flag is read by truthiness and absent flags are
    /// off.
    pub fn from_json(body: &Value) -> ApiResult<Self> {
        let url = body
            .get("url")
            .and_then(Value::as_str)
            .ok_or(ApiError::InvalidUrl)?
            .to_string();

        let options = match body.get("options") {
            Some(opts) if is_truthy(opts) => JobOptions {
                extract_text: opts.get("extractText").is_some_and(is_truthy),
                audio_only: opts.get("audioOnly").is_some_and(is_truthy),
            },
            _ => JobOptions::default(),
        };

        Ok(Self { url, options })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /process
///
/// Register a fetch job and return its ID without waiting for it.
///
/// Returns:
/// - 200: `{jobId}`
/// - 400: `{error: "INVALID_URL"}` for a missing/empty/non-string url or an
///   unparseable body
pub async fn process_media(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ProcessResponse>> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Rejected /process body: {}", rejection);
            return Err(ApiError::InvalidUrl);
        }
    };

    let request = ProcessRequest::from_json(&body)?;
    let job_id = state
        .controller
        .submit(&request.url, request.options)
        .await?;

    info!(
        job_id = %job_id,
        url = %request.url,
        extract_text = request.options.extract_text,
        audio_only = request.options.audio_only,
        "Job submitted"
    );

    Ok(Json(ProcessResponse {
        job_id: job_id.to_string(),
    }))
}

/// GET /status?jobId=...
///
/// Returns:
/// - 200: the job view for its current status
/// - 404: `{status: "not_found"}` for unknown or missing IDs
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<JobView>> {
    let job_id = query
        .job_id
        .filter(|id| !id.is_empty())
        .map(JobId::from_string)
        .ok_or(ApiError::JobNotFound)?;

    let view = state.controller.query_status(&job_id).await;
    if !view.is_found() {
        return Err(ApiError::JobNotFound);
    }
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_without_options_uses_defaults() {
        let request = ProcessRequest::from_json(&json!({"url": "https://example.com/v"})).unwrap();
        assert_eq!(request.url, "https://example.com/v");
        assert_eq!(request.options, JobOptions::default());

        let request =
            ProcessRequest::from_json(&json!({"url": "u", "options": null})).unwrap();
        assert_eq!(request.options, JobOptions::default());
    }

    #[test]
    fn test_request_with_partial_options() {
        let request = ProcessRequest::from_json(&json!({
            "url": "u",
            "options": {"extractText": true}
        }))
        .unwrap();
        assert_eq!(
            request.options,
            JobOptions {
                extract_text: true,
                audio_only: false
            }
        );
    }

    #[test]
    fn test_request_option_truthiness() {
        let request = ProcessRequest::from_json(&json!({
            "url": "u",
            "options": {"extractText": 0, "audioOnly": "yes"}
        }))
        .unwrap();
        assert!(!request.options.extract_text);
        assert!(request.options.audio_only);
    }

    #[test]
    fn test_request_rejects_non_string_url() {
        assert!(matches!(
            ProcessRequest::from_json(&json!({"url": 42})),
            Err(ApiError::InvalidUrl)
        ));
        assert!(matches!(
            ProcessRequest::from_json(&json!({})),
            Err(ApiError::InvalidUrl)
        ));
    }
}
