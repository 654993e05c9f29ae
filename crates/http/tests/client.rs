//! Execution-layer behaviour against an in-process mock service.

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, put},
};
use pdfops_config::ClientConfig;
use pdfops_http::{ServiceClient, ServiceRequest};
use pdfops_types::{PdfOpsError, Result, SessionToken, TokenProvider};
use serde_json::json;
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

/// Hands out `token-N`; `invalidate` bumps N.
struct StubTokens {
    generation: AtomicUsize,
    invalidations: AtomicUsize,
}

impl StubTokens {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            generation: AtomicUsize::new(1),
            invalidations: AtomicUsize::new(0),
        })
    }

    fn current(&self) -> SessionToken {
        let n = self.generation.load(Ordering::SeqCst);
        SessionToken::from_ttl(format!("token-{n}"), Duration::from_secs(3600))
    }
}

#[async_trait]
impl TokenProvider for StubTokens {
    async fn session_token(&self, _force_refresh: bool) -> Result<SessionToken> {
        Ok(self.current())
    }

    async fn invalidate(&self, _stale: &SessionToken) -> Result<SessionToken> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(self.current())
    }

    fn client_id(&self) -> &str {
        "client-1"
    }
}

#[derive(Clone, Default)]
struct Mock {
    secure_calls: Arc<AtomicUsize>,
    polls: Arc<AtomicUsize>,
    uploaded: Arc<Mutex<Option<(String, Vec<u8>)>>>,
    last_headers: Arc<Mutex<Option<HeaderMap>>>,
}

/// Accepts only `token-2`; everything else is a 401.
async fn secure(State(m): State<Mock>, headers: HeaderMap) -> impl IntoResponse {
    m.secure_calls.fetch_add(1, Ordering::SeqCst);
    *m.last_headers.lock().unwrap() = Some(headers.clone());
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if auth == "Bearer token-2" {
        (StatusCode::OK, Json(json!({"ok": true})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"code": "401013", "message": "Oauth token is not valid"}})),
        )
    }
}

async fn always_unauthorized() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"code": "401013", "message": "Oauth token is not valid"}})),
    )
}

async fn quota() -> impl IntoResponse {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({"error": {"code": "TOO_MANY", "message": "slow down"}})),
    )
}

/// Reports "in progress" twice, then the outcome named by the path.
async fn job(State(m): State<Mock>, Path(outcome): Path<String>) -> impl IntoResponse {
    let n = m.polls.fetch_add(1, Ordering::SeqCst) + 1;
    let body = match (outcome.as_str(), n) {
        ("forever", _) | (_, 1 | 2) => json!({"status": "in progress"}),
        ("done", _) => json!({"status": "done", "asset": {"downloadUri": "http://x/y"}}),
        _ => json!({"status": "failed", "error": {"code": "CORRUPT_DOCUMENT", "message": "bad input", "status": 400}}),
    };
    (StatusCode::OK, Json(body))
}

/// Answers only after 1.5 s; `done` finishes the job, anything else keeps it running.
async fn slow_job(Path(outcome): Path<String>) -> impl IntoResponse {
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let status = if outcome == "done" { "done" } else { "in progress" };
    (StatusCode::OK, Json(json!({"status": status})))
}

async fn file() -> impl IntoResponse {
    ([("content-type", "application/pdf")], b"%PDF-1.7 test".to_vec())
}

async fn upload(State(m): State<Mock>, headers: HeaderMap, body: axum::body::Bytes) -> StatusCode {
    let ct = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    *m.uploaded.lock().unwrap() = Some((ct, body.to_vec()));
    StatusCode::OK
}

async fn spawn(mock: Mock) -> String {
    let app = Router::new()
        .route("/secure", get(secure))
        .route("/always401", get(always_unauthorized))
        .route("/quota", get(quota))
        .route("/jobs/{outcome}", get(job))
        .route("/slow/{outcome}", get(slow_job))
        .route("/files/out.pdf", get(file))
        .route("/upload", put(upload))
        .with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn fast_config() -> ClientConfig {
    ClientConfig {
        app_info: "pdfops-test/1.0".into(),
        poll_interval_ms: 10,
        max_poll_interval_ms: 20,
        ..ClientConfig::default()
    }
}

fn client(tokens: Arc<StubTokens>) -> ServiceClient {
    ServiceClient::new(tokens, fast_config()).unwrap()
}

#[tokio::test]
async fn test_401_refreshes_once_and_retries() {
    let mock = Mock::default();
    let base = spawn(mock.clone()).await;
    let tokens = StubTokens::new();
    let client = client(Arc::clone(&tokens));

    let resp = client
        .call(ServiceRequest::get(format!("{base}/secure")))
        .await
        .unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(mock.secure_calls.load(Ordering::SeqCst), 2);
    assert_eq!(tokens.invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_second_401_propagates_without_looping() {
    let base = spawn(Mock::default()).await;
    let tokens = StubTokens::new();
    let client = client(Arc::clone(&tokens));

    let err = client
        .call(ServiceRequest::get(format!("{base}/always401")))
        .await
        .unwrap_err();

    assert!(err.is_auth_rejection());
    assert_eq!(err.error_code(), Some("401013"));
    assert_eq!(tokens.invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_standard_headers_attached() {
    let mock = Mock::default();
    let base = spawn(mock.clone()).await;
    let client = client(StubTokens::new());

    client
        .call(ServiceRequest::get(format!("{base}/secure")))
        .await
        .unwrap();

    let headers = mock.last_headers.lock().unwrap().clone().unwrap();
    assert_eq!(headers["authorization"], "Bearer token-2");
    assert_eq!(headers["x-api-key"], "client-1");
    assert_eq!(headers["x-api-app-info"], "pdfops-test/1.0");
    assert_eq!(headers["x-request-id"].to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_unauthenticated_request_skips_token() {
    let base = spawn(Mock::default()).await;
    let tokens = StubTokens::new();
    let client = client(Arc::clone(&tokens));

    let err = client
        .call(ServiceRequest::get(format!("{base}/secure")).unauthenticated())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    assert_eq!(tokens.invalidations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_429_maps_to_service_usage() {
    let base = spawn(Mock::default()).await;
    let client = client(StubTokens::new());

    let err = client
        .call(ServiceRequest::get(format!("{base}/quota")))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::ServiceUsage { status_code: 429, .. }));
}

#[tokio::test]
async fn test_poll_until_done() {
    let mock = Mock::default();
    let base = spawn(mock.clone()).await;
    let client = client(StubTokens::new());

    let status = client
        .poll(&format!("{base}/jobs/done"), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(status["asset"]["downloadUri"], "http://x/y");
    assert_eq!(mock.polls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_poll_failed_job_is_service_api_error() {
    let base = spawn(Mock::default()).await;
    let client = client(StubTokens::new());

    let err = client
        .poll(&format!("{base}/jobs/failed"), Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::ServiceApi { status_code: 400, .. }));
    assert_eq!(err.error_code(), Some("CORRUPT_DOCUMENT"));
    assert_eq!(err.request_tracking_id(), Some("failed"));
}

#[tokio::test]
async fn test_poll_timeout_is_distinct_from_service_error() {
    let base = spawn(Mock::default()).await;
    let client = client(StubTokens::new());

    let err = client
        .poll(&format!("{base}/jobs/forever"), Duration::from_millis(100))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::Timeout { .. }));
    assert!(!err.is_service_error());
    assert_eq!(err.request_tracking_id(), Some("forever"));
}

#[tokio::test]
async fn test_poll_deadline_bounds_a_stalled_poll() {
    let base = spawn(Mock::default()).await;
    let client = client(StubTokens::new());

    let started = std::time::Instant::now();
    let err = client
        .poll(&format!("{base}/slow/done"), Duration::from_millis(200))
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_millis(1200));
    match err {
        PdfOpsError::Timeout {
            request_tracking_id,
            elapsed_ms,
        } => {
            assert_eq!(request_tracking_id, "done");
            assert!((200..1200).contains(&elapsed_ms), "elapsed_ms={elapsed_ms}");
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_poll_read_timeout_keeps_polling_until_deadline() {
    let base = spawn(Mock::default()).await;
    let config = ClientConfig {
        read_timeout_ms: 300,
        ..fast_config()
    };
    let client = ServiceClient::new(StubTokens::new(), config).unwrap();

    let started = std::time::Instant::now();
    let err = client
        .poll(&format!("{base}/slow/running"), Duration::from_secs(1))
        .await
        .unwrap_err();

    assert!(started.elapsed() >= Duration::from_millis(900));
    assert!(matches!(err, PdfOpsError::Timeout { .. }), "got {err:?}");
    assert_eq!(err.request_tracking_id(), Some("running"));
}

#[tokio::test]
async fn test_request_read_timeout_is_timeout_error() {
    let base = spawn(Mock::default()).await;
    let config = ClientConfig {
        read_timeout_ms: 200,
        ..fast_config()
    };
    let client = ServiceClient::new(StubTokens::new(), config).unwrap();

    let err = client
        .call(ServiceRequest::get(format!("{base}/slow/done")).header("x-request-id", "req-slow"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::Timeout { .. }), "got {err:?}");
    assert!(!err.is_service_error());
    assert_eq!(err.request_tracking_id(), Some("req-slow"));
}

#[tokio::test]
async fn test_download_writes_file() {
    let base = spawn(Mock::default()).await;
    let client = client(StubTokens::new());
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("nested").join("out.pdf");

    let n = client
        .download(&format!("{base}/files/out.pdf"), &dest)
        .await
        .unwrap();

    assert_eq!(n, 13);
    assert_eq!(std::fs::read(&dest).unwrap(), b"%PDF-1.7 test");
}

#[tokio::test]
async fn test_download_missing_asset_leaves_no_file() {
    let base = spawn(Mock::default()).await;
    let client = client(StubTokens::new());
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("missing.pdf");

    let err = client
        .download(&format!("{base}/files/missing.pdf"), &dest)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_upload_streams_reader() {
    let mock = Mock::default();
    let base = spawn(mock.clone()).await;
    let client = client(StubTokens::new());

    client
        .upload(
            &format!("{base}/upload"),
            "application/pdf",
            std::io::Cursor::new(b"%PDF-1.4 input".to_vec()),
        )
        .await
        .unwrap();

    let (ct, body) = mock.uploaded.lock().unwrap().clone().unwrap();
    assert_eq!(ct, "application/pdf");
    assert_eq!(body, b"%PDF-1.4 input");
}
