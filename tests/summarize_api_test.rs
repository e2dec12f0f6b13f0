//! Integration tests for the summarize HTTP API in fallback-only mode
//!
//! These tests drive the full router in-process and never touch the network.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use doc_summarizer::{
    api::{build_router, error::PAYLOAD_TOO_LARGE_MESSAGE, AppState},
    config::ServerConfig,
    summarize::{fallback, validate_str, LengthTier, SummaryService},
};
use serde_json::{json, Value};
use tower::ServiceExt;

const ARTICLE: &str = "Rust is a systems programming language. It focuses on safety and speed. \
    The borrow checker prevents data races at compile time. Cargo handles builds and dependencies. \
    Crates are published to a shared registry. Many teams adopt it for network services.";

const BOUNDARY: &str = "summarizer-test-boundary";

fn router() -> Router {
    build_router(AppState::new(SummaryService::fallback_only()), &ServerConfig::default())
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/summarize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/summarize")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn expected_fallback(text: &str, tier: LengthTier) -> String {
    fallback::summarize(&validate_str(text).unwrap(), "english", tier)
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_json_summary_matches_fallback() {
    for (length, tier) in [
        ("short", LengthTier::Short),
        ("medium", LengthTier::Medium),
        ("long", LengthTier::Long),
    ] {
        let (status, body) = send(
            router(),
            json_request(json!({ "text": ARTICLE, "summaryLength": length })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], expected_fallback(ARTICLE, tier));
    }
}

#[tokio::test]
async fn test_defaults_to_medium() {
    let (status, body) = send(
        router(),
        json_request(json!({ "text": ARTICLE, "summaryLength": "enormous" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], expected_fallback(ARTICLE, LengthTier::Medium));
}

#[tokio::test]
async fn test_script_block_is_stripped() {
    let text = "<script>alert(1)</script>Hello world, this is a long enough passage to pass length validation easily.";
    let (status, body) = send(router(), json_request(json!({ "text": text }))).await;

    assert_eq!(status, StatusCode::OK);
    let summary = body["summary"].as_str().unwrap();
    assert!(!summary.contains("<script>"));
    assert_eq!(summary, expected_fallback(text, LengthTier::Medium));
}

#[tokio::test]
async fn test_validation_errors() {
    let cases = [
        (json!({}), "Text is required and must be a string"),
        (json!({ "text": 12345 }), "Text is required and must be a string"),
        (json!({ "text": "too short" }), "Text must be at least 50 characters long"),
        (
            json!({ "text": "a".repeat(10_001) }),
            "Text must not exceed 10000 characters",
        ),
    ];

    for (payload, message) in cases {
        let (status, body) = send(router(), json_request(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }
}

#[tokio::test]
async fn test_invalid_json_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/summarize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON body");
}

#[tokio::test]
async fn test_text_upload() {
    let request = multipart_request(&[
        ("summaryLength", None, "short"),
        ("file", Some("article.txt"), ARTICLE),
    ]);
    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"], expected_fallback(ARTICLE, LengthTier::Short));
}

#[tokio::test]
async fn test_upload_rejections() {
    let cases: [(&[(&str, Option<&str>, &str)], &str); 4] = [
        (
            &[("file", Some("slides.pptx"), "whatever")],
            "Unsupported file type. Please upload a PDF, DOCX or TXT file",
        ),
        (&[("file", Some("empty.txt"), "")], "Uploaded file is empty"),
        (&[("language", None, "french")], "No file uploaded"),
        (
            &[("file", Some("tiny.txt"), "Too short to summarize.")],
            "Text must be at least 50 characters long",
        ),
    ];

    for (parts, message) in cases {
        let (status, body) = send(router(), multipart_request(parts)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }
}

#[tokio::test]
async fn test_corrupt_document_hides_details() {
    let request = multipart_request(&[("file", Some("broken.docx"), "not a zip archive")]);
    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to process the request");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let server = ServerConfig {
        max_upload_bytes: 1024,
        ..ServerConfig::default()
    };
    let router = build_router(AppState::new(SummaryService::fallback_only()), &server);

    let payload = json!({ "text": "x".repeat(4096) }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/api/summarize")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();

    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], PAYLOAD_TOO_LARGE_MESSAGE);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let server = ServerConfig {
        max_upload_bytes: 1024,
        ..ServerConfig::default()
    };
    let router = build_router(AppState::new(SummaryService::fallback_only()), &server);

    let content = "Long line of uploaded text. ".repeat(200);
    let (status, body) = send(
        router,
        multipart_request(&[("file", Some("big.txt"), content.as_str())]),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], PAYLOAD_TOO_LARGE_MESSAGE);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    send(router(), json_request(json!({ "text": ARTICLE }))).await;

    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("summarize_requests_total"));
    assert!(text.contains("summaries_produced_total"));
}
