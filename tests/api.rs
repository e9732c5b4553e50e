//! Router-level integration tests.
//!
//! The extractor and summariser are swapped for deterministic stubs, so
//! these tests exercise the full HTTP surface (routing, payload decoding,
//! error mapping) without parsing a real PDF or touching the network. The
//! stubs count their calls, which lets the tests assert not just what came
//! back but which collaborators ran.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use docrelay::{
    build_router, AppConfig, AppState, RelayError, SummarizeOptions, Summarizer, TextExtractor,
};

// ── Stub collaborators ───────────────────────────────────────────────────────

/// Extractor stub: accepts anything carrying the PDF magic, records every
/// buffer it was handed.
#[derive(Default)]
struct StubExtractor {
    seen: Mutex<Vec<Vec<u8>>>,
}

impl StubExtractor {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn buffers(&self) -> Vec<Vec<u8>> {
        self.seen.lock().unwrap().clone()
    }
}

impl TextExtractor for StubExtractor {
    fn extract(&self, buffer: &[u8]) -> Result<String, RelayError> {
        self.seen.lock().unwrap().push(buffer.to_vec());
        if buffer.is_empty() {
            return Ok(String::new());
        }
        if buffer.starts_with(b"%PDF") {
            Ok("Page 1 text".to_string())
        } else {
            Err(RelayError::Extraction("stub: missing %PDF header".into()))
        }
    }
}

/// Summariser stub with a fixed reply, optional failure mode, and a call
/// counter.
struct StubSummarizer {
    reply: String,
    fail: bool,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Option<String>)>>,
}

impl StubSummarizer {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            fail: false,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: String::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn requests(&self) -> Vec<(String, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for StubSummarizer {
    async fn summarize(
        &self,
        text: &str,
        context: Option<&str>,
        _options: Option<&SummarizeOptions>,
    ) -> Result<String, RelayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((text.to_string(), context.map(str::to_string)));

        if self.fail {
            return Err(RelayError::SummarizationApi {
                status: 502,
                body: "upstream down".into(),
            });
        }
        if text.trim().is_empty() {
            return Ok(String::new());
        }
        Ok(self.reply.clone())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn test_app(extractor: Arc<StubExtractor>, summarizer: Arc<StubSummarizer>) -> Router {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        extractor,
        summarizer,
    };
    build_router(state).expect("router should build")
}

async fn post_json(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ── Probes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_probe_reports_status_and_credential_flag() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    let response = app
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_string());
    // Default config carries no credential.
    assert_eq!(body["env"]["OPENAI_API_KEY_SET"], false);
}

#[tokio::test]
async fn root_serves_usage_page() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"), "got: {content_type}");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let page = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(page.contains("docrelay"));
    assert!(page.contains("/buffer-to-text"));
}

// ── /summarize ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn summarize_returns_stub_summary() {
    let summarizer = StubSummarizer::new("Greeting.");
    let app = test_app(StubExtractor::new(), summarizer.clone());

    let (status, body) = post_json(app, "/summarize", json!({ "text": "hello world" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "summary": "Greeting." }));
    assert_eq!(summarizer.call_count(), 1);
}

#[tokio::test]
async fn summarize_without_text_is_400_and_calls_nothing() {
    let summarizer = StubSummarizer::new("unused");
    let app = test_app(StubExtractor::new(), summarizer.clone());

    let (status, body) = post_json(app, "/summarize", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "text required in body" }));
    assert_eq!(summarizer.call_count(), 0);
}

#[tokio::test]
async fn summarize_forwards_context() {
    let summarizer = StubSummarizer::new("Done.");
    let app = test_app(StubExtractor::new(), summarizer.clone());

    let (status, _) = post_json(
        app,
        "/summarize",
        json!({ "text": "body", "context": "meeting notes" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let requests = summarizer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "body");
    assert_eq!(requests[0].1.as_deref(), Some("meeting notes"));
}

#[tokio::test]
async fn summarize_empty_text_yields_empty_summary() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    let (status, body) = post_json(app, "/summarize", json!({ "text": "" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "summary": "" }));
}

#[tokio::test]
async fn summarizer_failure_maps_to_500_with_error_body() {
    let app = test_app(StubExtractor::new(), StubSummarizer::failing());

    let (status, body) = post_json(app, "/summarize", json!({ "text": "hello" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("502"), "got: {message}");
    assert!(message.contains("upstream down"), "got: {message}");
}

// ── /buffer-to-text ──────────────────────────────────────────────────────────

#[tokio::test]
async fn buffer_base64_pdf_is_extracted_and_summarized() {
    let extractor = StubExtractor::new();
    let summarizer = StubSummarizer::new("A page of text.");
    let app = test_app(extractor.clone(), summarizer.clone());

    let pdf_bytes = b"%PDF-1.4 minimal document".to_vec();
    let encoded = STANDARD.encode(&pdf_bytes);

    let (status, body) = post_json(app, "/buffer-to-text", json!({ "buffer": encoded })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "text": "Page 1 text", "summary": "A page of text." })
    );

    // The extractor must have seen the decoded bytes, not the base64 string.
    assert_eq!(extractor.buffers(), vec![pdf_bytes]);
    assert_eq!(summarizer.call_count(), 1);
}

#[tokio::test]
async fn buffer_numeric_array_reaches_extractor_byte_for_byte() {
    let extractor = StubExtractor::new();
    let app = test_app(extractor.clone(), StubSummarizer::new("ok"));

    let (status, body) =
        post_json(app, "/buffer-to-text", json!({ "buffer": [37, 80, 68, 70] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Page 1 text");
    assert_eq!(extractor.buffers(), vec![b"%PDF".to_vec()]);
}

#[tokio::test]
async fn buffer_missing_field_is_400() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    let (status, body) = post_json(app, "/buffer-to-text", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "buffer required in body" }));
}

#[tokio::test]
async fn buffer_plain_text_bypasses_extraction() {
    let extractor = StubExtractor::new();
    let summarizer = StubSummarizer::new("Summed.");
    let app = test_app(extractor.clone(), summarizer.clone());

    // Contains a space, so it is not valid base64 and not a JSON array.
    let (status, body) =
        post_json(app, "/buffer-to-text", json!({ "buffer": "plain notes" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "plain notes");
    assert!(extractor.buffers().is_empty(), "extractor must not run");
    assert_eq!(summarizer.call_count(), 1);
}

#[tokio::test]
async fn buffer_base64_without_pdf_magic_is_treated_as_text() {
    let extractor = StubExtractor::new();
    let app = test_app(extractor.clone(), StubSummarizer::new("ok"));

    let encoded = STANDARD.encode(b"just some notes");
    let (status, body) =
        post_json(app, "/buffer-to-text", json!({ "buffer": encoded.clone() })).await;
    assert_eq!(status, StatusCode::OK);
    // The original string comes back untouched; no decode was committed.
    assert_eq!(body["text"], encoded);
    assert!(extractor.buffers().is_empty());
}

#[tokio::test]
async fn buffer_unsupported_shape_is_500() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    let (status, body) =
        post_json(app, "/buffer-to-text", json!({ "buffer": { "nested": 1 } })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("unsupported input"));
}

#[tokio::test]
async fn buffer_extraction_failure_is_500_with_parser_message() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    // Bytes without the PDF magic make the stub extractor fail.
    let (status, body) = post_json(app, "/buffer-to-text", json!({ "buffer": [1, 2, 3] })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("text extraction failed"), "got: {message}");
    assert!(message.contains("%PDF"), "got: {message}");
}

// ── /blob-to-text ────────────────────────────────────────────────────────────

#[tokio::test]
async fn blob_json_field_is_accepted() {
    let extractor = StubExtractor::new();
    let app = test_app(extractor.clone(), StubSummarizer::new("Summed."));

    let (status, body) =
        post_json(app, "/blob-to-text", json!({ "blob": [37, 80, 68, 70] })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Page 1 text");
    assert_eq!(body["summary"], "Summed.");
    assert_eq!(extractor.buffers(), vec![b"%PDF".to_vec()]);
}

#[tokio::test]
async fn blob_missing_everything_is_400() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    let (status, body) = post_json(app, "/blob-to-text", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "file or blob required in body" }));
}

fn multipart_request(path: &str, field_name: &str, content: &[u8]) -> Request<Body> {
    let boundary = "docrelay-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field_name}\"; \
             filename=\"doc.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn blob_multipart_file_is_extracted() {
    let extractor = StubExtractor::new();
    let app = test_app(extractor.clone(), StubSummarizer::new("Summed."));

    let request = multipart_request("/blob-to-text", "file", b"%PDF-1.7 upload");
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["text"], "Page 1 text");
    assert_eq!(extractor.buffers(), vec![b"%PDF-1.7 upload".to_vec()]);
}

#[tokio::test]
async fn blob_multipart_without_file_field_is_400() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    let request = multipart_request("/blob-to-text", "attachment", b"%PDF-1.7 upload");
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "file or blob required in body");
}

// ── CORS ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn preflight_from_allowed_origin_is_accepted() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/summarize")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok());
    assert_eq!(allowed, Some("http://localhost:3000"));
}

#[tokio::test]
async fn preflight_from_unknown_origin_gets_no_allow_header() {
    let app = test_app(StubExtractor::new(), StubSummarizer::new("unused"));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/summarize")
        .header(header::ORIGIN, "http://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
