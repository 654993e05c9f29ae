//! End-to-end operation runs against an in-process mock of the service.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use pdfops_auth::Credentials;
use pdfops_config::ClientConfig;
use pdfops_io::FileRef;
use pdfops_operation::{
    CombineFiles, CompressPdf, CreatePdf, ExecutionContext, PdfProperties,
};
use pdfops_options::{
    CompressPdfOptions, CompressionLevel, CreatePdfFromHtmlOptions, PageRanges,
    PdfPropertiesOptions,
};
use pdfops_types::PdfOpsError;
use serde_json::{Value, json};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

const RESULT_PDF: &[u8] = b"%PDF-1.7 compressed";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// 201 + location; the job is done on the second poll.
    Async,
    /// 200 with the PDF bytes in the body.
    Inline,
    /// 201 + location; the job never finishes.
    Stuck,
    /// 201 + location; the job fails.
    Fails,
    /// 429 on submission.
    Quota,
    /// 201 + location; the job reports inline metadata.
    Metadata,
}

#[derive(Clone)]
struct Service {
    base: String,
    mode: Mode,
    token_calls: Arc<AtomicUsize>,
    asset_calls: Arc<AtomicUsize>,
    polls: Arc<AtomicUsize>,
    uploads: Arc<Mutex<Vec<Vec<u8>>>>,
    submitted: Arc<Mutex<Option<(String, HeaderMap, Value)>>>,
}

impl Service {
    fn uploads(&self) -> Vec<Vec<u8>> {
        self.uploads.lock().unwrap().clone()
    }

    fn submitted(&self) -> (String, HeaderMap, Value) {
        self.submitted.lock().unwrap().clone().unwrap()
    }
}

async fn token(State(s): State<Service>) -> Json<Value> {
    let n = s.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({"access_token": format!("token-{n}"), "expires_in": 86_400_000}))
}

async fn create_asset(State(s): State<Service>, Json(body): Json<Value>) -> Json<Value> {
    let n = s.asset_calls.fetch_add(1, Ordering::SeqCst) + 1;
    assert!(body["mediaType"].is_string());
    Json(json!({
        "uploadUri": format!("{}/upload/asset-{n}", s.base),
        "assetID": format!("asset-{n}"),
    }))
}

async fn upload(State(s): State<Service>, body: Bytes) -> StatusCode {
    s.uploads.lock().unwrap().push(body.to_vec());
    StatusCode::OK
}

async fn submit(
    State(s): State<Service>,
    Path(endpoint): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    *s.submitted.lock().unwrap() = Some((endpoint, headers, body));
    let location = [("location", format!("{}/jobs/job-42", s.base))];
    match s.mode {
        Mode::Inline => {
            ([("content-type", "application/pdf")], RESULT_PDF.to_vec()).into_response()
        }
        Mode::Quota => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"code": "QUOTA_EXCEEDED", "message": "quota exhausted"}})),
        )
            .into_response(),
        _ => (StatusCode::CREATED, location).into_response(),
    }
}

async fn job(State(s): State<Service>) -> Json<Value> {
    let n = s.polls.fetch_add(1, Ordering::SeqCst) + 1;
    Json(match (s.mode, n) {
        (Mode::Stuck, _) | (_, 1) => json!({"status": "in progress"}),
        (Mode::Fails, _) => json!({
            "status": "failed",
            "error": {"code": "BAD_PDF", "message": "input is corrupt", "status": 400}
        }),
        (Mode::Metadata, _) => json!({
            "status": "done",
            "metadata": {"document": {"page_count": 3}}
        }),
        _ => json!({
            "status": "done",
            "asset": {"assetID": "result-1", "downloadUri": format!("{}/download/result", s.base)}
        }),
    })
}

async fn download() -> impl IntoResponse {
    ([("content-type", "application/pdf")], RESULT_PDF.to_vec())
}

async fn spawn(mode: Mode) -> Service {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let service = Service {
        base,
        mode,
        token_calls: Arc::default(),
        asset_calls: Arc::default(),
        polls: Arc::default(),
        uploads: Arc::default(),
        submitted: Arc::default(),
    };
    let app = Router::new()
        .route("/ims/token", post(token))
        .route("/assets", post(create_asset))
        .route("/upload/{id}", put(upload))
        .route("/operation/{endpoint}", post(submit))
        .route("/jobs/{id}", get(job))
        .route("/download/result", get(download))
        .with_state(service.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    service
}

fn context(service: &Service, temp: &std::path::Path, timeout_ms: u64) -> ExecutionContext {
    let credentials = Credentials::auth_code("client-1", "secret-1", "code-1")
        .unwrap()
        .with_ims_uri(format!("{}/ims/token", service.base))
        .unwrap()
        .with_api_base_uri(service.base.clone())
        .unwrap();
    let config = ClientConfig {
        poll_interval_ms: 10,
        max_poll_interval_ms: 20,
        operation_timeout_ms: timeout_ms,
        temp_dir: Some(temp.join("staging")),
        ..ClientConfig::default()
    };
    ExecutionContext::create(credentials, config).unwrap()
}

fn pdf_input(dir: &std::path::Path, name: &str) -> FileRef {
    let path = dir.join(name);
    std::fs::write(&path, format!("%PDF-1.4 {name}")).unwrap();
    FileRef::from_local_file(path, None).unwrap()
}

fn compress(input: FileRef) -> CompressPdf {
    let options = CompressPdfOptions::builder()
        .compression_level(CompressionLevel::Medium)
        .build();
    let mut op = CompressPdf::create_new(options);
    op.set_input(input);
    op
}

#[tokio::test]
async fn test_compress_medium_end_to_end() {
    let service = spawn(Mode::Async).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let mut result = compress(pdf_input(tmp.path(), "input.pdf"))
        .execute(&ctx)
        .await
        .unwrap();

    assert!(result.is_operation_result());
    assert_eq!(result.media_type(), Some("application/pdf"));

    let (endpoint, headers, body) = service.submitted();
    assert_eq!(endpoint, "compresspdf");
    assert_eq!(body, json!({"compressionLevel": "MEDIUM", "assetID": "asset-1"}));
    assert_eq!(headers["authorization"], "Bearer token-1");
    assert_eq!(headers["x-api-key"], "client-1");
    assert_eq!(service.uploads(), vec![b"%PDF-1.4 input.pdf".to_vec()]);

    let saved = result
        .save_as_file(tmp.path().join("out").join("compressed.pdf"))
        .await
        .unwrap();
    assert_eq!(std::fs::read(&saved).unwrap(), RESULT_PDF);

    let again = result.save_as_file(tmp.path().join("again.pdf")).await;
    assert!(matches!(again, Err(PdfOpsError::Usage(_))));
}

#[tokio::test]
async fn test_inline_result() {
    let service = spawn(Mode::Inline).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let mut result = compress(pdf_input(tmp.path(), "input.pdf"))
        .execute(&ctx)
        .await
        .unwrap();

    let mut out = Vec::new();
    result.write_to_stream(&mut out).await.unwrap();
    assert_eq!(out, RESULT_PDF);
    assert_eq!(service.polls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_timeout_is_not_a_service_error() {
    let service = spawn(Mode::Stuck).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 200);

    let err = compress(pdf_input(tmp.path(), "input.pdf"))
        .execute(&ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::Timeout { .. }), "{err:?}");
    assert!(!err.is_service_error());
    assert_eq!(err.request_tracking_id(), Some("job-42"));
}

#[tokio::test]
async fn test_failed_job_is_service_api_error() {
    let service = spawn(Mode::Fails).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let err = compress(pdf_input(tmp.path(), "input.pdf"))
        .execute(&ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::ServiceApi { .. }), "{err:?}");
    assert_eq!(err.error_code(), Some("BAD_PDF"));
    assert_eq!(err.status_code(), Some(400));
}

#[tokio::test]
async fn test_quota_rejection_is_service_usage_error() {
    let service = spawn(Mode::Quota).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let err = compress(pdf_input(tmp.path(), "input.pdf"))
        .execute(&ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfOpsError::ServiceUsage { .. }), "{err:?}");
    assert_eq!(err.error_code(), Some("QUOTA_EXCEEDED"));
}

#[tokio::test]
async fn test_invalid_input_fails_before_network() {
    let service = spawn(Mode::Async).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let docx = FileRef::from_local_file(tmp.path().join("memo.docx"), None).unwrap();
    let err = compress(docx).execute(&ctx).await.unwrap_err();
    assert!(matches!(err, PdfOpsError::Validation(_)));

    let err = CompressPdf::create_new(CompressPdfOptions::default())
        .execute(&ctx)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("requires an input file"));

    assert_eq!(service.token_calls.load(Ordering::SeqCst), 0);
    assert_eq!(service.asset_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_input_file_creates_no_asset() {
    let service = spawn(Mode::Async).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let missing = FileRef::from_local_file(tmp.path().join("absent.pdf"), None).unwrap();
    let err = compress(missing).execute(&ctx).await.unwrap_err();

    assert!(matches!(err, PdfOpsError::Io(_)), "{err:?}");
    assert_eq!(service.asset_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_html_url_input_skips_upload() {
    let service = spawn(Mode::Async).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let mut op = CreatePdf::create_new();
    op.set_input(FileRef::from_url("https://example.com/report.html").unwrap());
    op.set_options(
        CreatePdfFromHtmlOptions::builder()
            .include_header_footer(false)
            .build(),
    );
    op.execute(&ctx).await.unwrap();

    let (endpoint, _, body) = service.submitted();
    assert_eq!(endpoint, "htmltopdf");
    assert_eq!(body["inputUrl"], "https://example.com/report.html");
    assert_eq!(body["includeHeaderFooter"], false);
    assert_eq!(body["json"], "{}");
    assert_eq!(service.asset_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_combine_uploads_every_input_in_order() {
    let service = spawn(Mode::Async).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let mut op = CombineFiles::create_new();
    op.add_input(pdf_input(tmp.path(), "a.pdf"), None);
    op.add_input(
        pdf_input(tmp.path(), "b.pdf"),
        Some(PageRanges::new().range(2, 3)),
    );
    op.execute(&ctx).await.unwrap();

    let (endpoint, _, body) = service.submitted();
    assert_eq!(endpoint, "combinepdf");
    assert_eq!(
        body,
        json!({"assets": [
            {"assetID": "asset-1"},
            {"assetID": "asset-2", "pageRanges": [{"start": 2, "end": 3}]},
        ]})
    );
    assert_eq!(
        service.uploads(),
        vec![b"%PDF-1.4 a.pdf".to_vec(), b"%PDF-1.4 b.pdf".to_vec()]
    );
}

#[tokio::test]
async fn test_properties_inline_metadata_becomes_json_result() {
    let service = spawn(Mode::Metadata).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let mut op = PdfProperties::create_new(
        PdfPropertiesOptions::builder()
            .include_page_level_properties(true)
            .build(),
    );
    op.set_input(pdf_input(tmp.path(), "input.pdf"));
    let mut result = op.execute(&ctx).await.unwrap();

    let saved = result
        .save_as_file(tmp.path().join("props"))
        .await
        .unwrap();
    assert_eq!(saved.extension().unwrap(), "json");
    let json: Value = serde_json::from_slice(&std::fs::read(saved).unwrap()).unwrap();
    assert_eq!(json["document"]["page_count"], 3);
}

#[tokio::test]
async fn test_concurrent_operations_share_one_token() {
    let service = spawn(Mode::Async).await;
    let tmp = tempfile::tempdir().unwrap();
    let ctx = context(&service, tmp.path(), 60_000);

    let handles: Vec<_> = (0..3)
        .map(|i| {
            let ctx = ctx.clone();
            let input = pdf_input(tmp.path(), &format!("in-{i}.pdf"));
            tokio::spawn(async move { compress(input).execute(&ctx).await })
        })
        .collect();
    for h in handles {
        assert!(h.await.unwrap().unwrap().is_operation_result());
    }
    assert_eq!(service.token_calls.load(Ordering::SeqCst), 1);
}
