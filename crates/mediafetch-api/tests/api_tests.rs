//! API integration tests.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use mediafetch_api::{create_router, ApiConfig, AppState};
use mediafetch_media::{MediaError, MediaMetadata, MediaResult, MediaTools};
use mediafetch_worker::FetchConfig;

/// Tool stand-in that writes placeholder artifacts.
struct StubTools {
    metadata: Option<&'static str>,
    fail_download: bool,
}

#[async_trait]
impl MediaTools for StubTools {
    async fn probe_metadata(&self, _url: &str) -> MediaResult<MediaMetadata> {
        match self.metadata {
            Some(json) => MediaMetadata::parse(json),
            None => Err(MediaError::process_failed(
                "yt-dlp",
                Some(1),
                String::new(),
                "ERROR: unavailable".into(),
            )),
        }
    }

    async fn download_video(&self, _url: &str, output: &Path) -> MediaResult<()> {
        if self.fail_download {
            return Err(MediaError::download_failed("ERROR: Unsupported URL"));
        }
        tokio::fs::write(output, b"video").await?;
        Ok(())
    }

    async fn extract_audio(&self, _video: &Path, output: &Path) -> MediaResult<()> {
        tokio::fs::write(output, b"audio").await?;
        Ok(())
    }
}

fn test_router(dir: &Path, tools: StubTools) -> Router {
    let fetch = FetchConfig::default()
        .with_files_dir(dir.to_path_buf())
        .with_public_base("http://media.test");
    let state = AppState::with_tools(ApiConfig::default(), fetch, Arc::new(tools));
    create_router(state, None)
}

fn default_tools() -> StubTools {
    StubTools {
        metadata: Some(r#"{"title":"T","description":"D","width":1280,"height":720}"#),
        fail_download: false,
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_process(app: &Router, body: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/process")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn poll_terminal(app: &Router, job_id: &str) -> Value {
    for _ in 0..500 {
        let response = get(app, &format!("/status?jobId={}", job_id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        if body["status"] == "done" || body["status"] == "failed" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never finished", job_id);
}

/// Test health endpoint.
#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), default_tools());

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_process_rejects_empty_url() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), default_tools());

    for body in [r#"{"url":""}"#, r#"{}"#, r#"{"url":7}"#, "not json"] {
        let response = post_process(&app, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(body_json(response).await, json!({"error": "INVALID_URL"}));
    }
}

#[tokio::test]
async fn test_process_accepts_whitespace_url() {
    let dir = tempfile::tempdir().unwrap();
    let tools = StubTools {
        metadata: None,
        fail_download: true,
    };
    let app = test_router(dir.path(), tools);

    let response = post_process(&app, r#"{"url":"   "}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let job_id = body["jobId"].as_str().unwrap().to_string();

    let view = poll_terminal(&app, &job_id).await;
    assert_eq!(view["status"], "failed");
}

#[tokio::test]
async fn test_status_unknown_and_missing_id() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), default_tools());

    for uri in ["/status?jobId=doesnotexist", "/status", "/status?jobId="] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {}", uri);
        assert_eq!(body_json(response).await, json!({"status": "not_found"}));
    }
}

#[tokio::test]
async fn test_submit_then_poll_done() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), default_tools());

    let response = post_process(
        &app,
        r#"{"url":"https://example.com/v1","options":{"extractText":true}}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let job_id = body["jobId"].as_str().unwrap().to_string();
    assert!(!job_id.is_empty());

    let view = poll_terminal(&app, &job_id).await;
    assert_eq!(
        view,
        json!({
            "status": "done",
            "videoUrl": format!("http://media.test/files/{}.mp4", job_id),
            "audioUrl": "",
            "text": "T\n\nD",
            "meta": {"width": 1280, "height": 720}
        })
    );
}

#[tokio::test]
async fn test_default_options_extract_audio_and_text() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), default_tools());

    let body = body_json(post_process(&app, r#"{"url":"https://example.com/v2"}"#).await).await;
    let job_id = body["jobId"].as_str().unwrap().to_string();

    let view = poll_terminal(&app, &job_id).await;
    assert_eq!(view["status"], "done");
    assert_eq!(
        view["audioUrl"],
        format!("http://media.test/files/{}.m4a", job_id)
    );
    assert_eq!(view["text"], "T\n\nD");
}

#[tokio::test]
async fn test_download_failure_reports_failed() {
    let dir = tempfile::tempdir().unwrap();
    let tools = StubTools {
        metadata: None,
        fail_download: true,
    };
    let app = test_router(dir.path(), tools);

    let body = body_json(post_process(&app, r#"{"url":"https://example.com/bad"}"#).await).await;
    let job_id = body["jobId"].as_str().unwrap().to_string();

    let view = poll_terminal(&app, &job_id).await;
    assert_eq!(view["status"], "failed");
    assert!(view["message"].as_str().unwrap().contains("Unsupported URL"));
    assert_eq!(view["audioUrl"], "");
    assert_eq!(view["text"], "");
}

#[tokio::test]
async fn test_files_are_served_with_cache_header() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("abc.mp4"), b"video").unwrap();
    let app = test_router(dir.path(), default_tools());

    let response = get(&app, "/files/abc.mp4").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=172800"
    );

    let response = get(&app, "/files/missing.mp4").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_route_absent_without_handle() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path(), default_tools());

    let response = get(&app, "/metrics").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
