//! The flow shared by every operation: upload inputs, submit the job, wait
//! for it, and stage the result as a single-use [`FileRef`].

use crate::ExecutionContext;
use pdfops_http::{ResponseContent, ServiceRequest, require_uri};
use pdfops_io::{FileRef, extension_for_media_type};
use pdfops_types::{PdfOpsError, Result, headers::request_id_from_location};
use serde::Serialize;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Static description of one service operation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Endpoint {
    /// Used in logs.
    pub name: &'static str,
    /// Path segment under `/operation/`.
    pub path: &'static str,
    /// Media types accepted as input; empty accepts anything.
    pub accepts: &'static [&'static str],
}

/// An input as the service addresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AssetRef {
    Id(String),
    Url(String),
}

impl AssetRef {
    /// The `{"assetID": ..}` / `{"inputUrl": ..}` payload fragment.
    pub(crate) fn to_json(&self) -> Value {
        match self {
            Self::Id(id) => json!({ "assetID": id }),
            Self::Url(url) => json!({ "inputUrl": url }),
        }
    }
}

/// Checks that an input exists and has a media type `endpoint` accepts.
pub(crate) fn check_input(
    endpoint: &Endpoint,
    input: Option<&FileRef>,
    allow_url: bool,
    violations: &mut Vec<String>,
) {
    let Some(input) = input else {
        violations.push(format!("{} requires an input file", endpoint.name));
        return;
    };
    if input.url().is_some() {
        if !allow_url {
            violations.push(format!("{} does not accept url inputs", endpoint.name));
        }
        return;
    }
    match input.media_type() {
        None => violations.push("media type of the input could not be determined".to_string()),
        Some(mt) if !endpoint.accepts.is_empty() && !endpoint.accepts.contains(&mt) => {
            violations.push(format!(
                "{} does not accept {mt} input, expected one of: {}",
                endpoint.name,
                endpoint.accepts.join(", ")
            ));
        }
        Some(_) => {}
    }
}

/// Raises the collected violations as one validation error.
pub(crate) fn reject(violations: Vec<String>) -> Result<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(PdfOpsError::Validation(violations))
    }
}

/// Validates the single input of an operation together with the option
/// `violations` already found, and hands the input back.
pub(crate) fn take_input(
    endpoint: &Endpoint,
    mut violations: Vec<String>,
    input: Option<FileRef>,
    allow_url: bool,
) -> Result<FileRef> {
    check_input(endpoint, input.as_ref(), allow_url, &mut violations);
    match input {
        Some(input) if violations.is_empty() => Ok(input),
        _ => Err(PdfOpsError::Validation(violations)),
    }
}

/// Serializes `options` and merges the `extra` object's keys into it.
pub(crate) fn payload(options: &impl Serialize, extra: Value) -> Result<Value> {
    let mut body = serde_json::to_value(options)?;
    if let (Value::Object(body), Value::Object(extra)) = (&mut body, extra) {
        body.extend(extra);
    }
    Ok(body)
}

/// Uploads a local or stream input, or passes a URL through.
pub(crate) async fn resolve_input(ctx: &ExecutionContext, input: &mut FileRef) -> Result<AssetRef> {
    if let Some(url) = input.url() {
        return Ok(AssetRef::Url(url.to_string()));
    }
    let media_type = input
        .media_type()
        .ok_or_else(|| PdfOpsError::validation("media type of the input could not be determined"))?
        .to_string();
    // Open the input first so a missing file never creates a remote asset.
    let reader = input.as_stream().await?;

    let resp = ctx
        .client()
        .call(
            ServiceRequest::post(format!("{}/assets", ctx.base_uri()))
                .json(json!({ "mediaType": media_type })),
        )
        .await?;
    let body = resp.json().cloned().unwrap_or_default();
    let upload_uri = require_uri(body.get("uploadUri").and_then(Value::as_str), "upload")?;
    let asset_id = body
        .get("assetID")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PdfOpsError::service_api(
                "service response is missing the asset id",
                Some(resp.request_id.clone()),
                Some(resp.status),
                None,
            )
        })?
        .to_string();

    ctx.client().upload(&upload_uri, &media_type, reader).await?;
    tracing::debug!(asset_id = %asset_id, media_type = %media_type, "input uploaded");
    Ok(AssetRef::Id(asset_id))
}

/// Submits the job and returns its result staged in the temp directory.
pub(crate) async fn submit(
    ctx: &ExecutionContext,
    endpoint: &Endpoint,
    body: Value,
    result_media_type: &str,
) -> Result<FileRef> {
    let uri = format!("{}/operation/{}", ctx.base_uri(), endpoint.path);
    let resp = ctx
        .client()
        .call(ServiceRequest::post(uri).json(body))
        .await?;

    if matches!(resp.status, 201 | 202)
        && let Some(location) = resp.location()
    {
        let job_id = request_id_from_location(Some(location));
        tracing::info!(operation = endpoint.name, job_id = %job_id, "operation submitted");
        let status = ctx
            .client()
            .poll(location, ctx.config().operation_timeout())
            .await?;
        let result = stage_from_status(ctx, &status, result_media_type, &job_id).await?;
        tracing::info!(operation = endpoint.name, job_id = %job_id, "operation completed");
        return Ok(result);
    }

    let job_id = resp.request_id.clone();
    let result = match &resp.content {
        ResponseContent::Json(status) => {
            stage_from_status(ctx, status, result_media_type, &job_id).await?
        }
        ResponseContent::Bytes(bytes) => stage_bytes(ctx, bytes, result_media_type).await?,
        ResponseContent::Text(text) => stage_bytes(ctx, text.as_bytes(), result_media_type).await?,
        ResponseContent::Empty => {
            return Err(PdfOpsError::service_api(
                format!("{} returned neither a result nor a job location", endpoint.name),
                Some(job_id),
                Some(resp.status),
                None,
            ));
        }
    };
    tracing::info!(operation = endpoint.name, job_id = %job_id, "operation completed inline");
    Ok(result)
}

/// Upload, submit and wait for an operation with one input.
pub(crate) async fn run_single(
    ctx: &ExecutionContext,
    endpoint: &Endpoint,
    options: &impl Serialize,
    input: &mut FileRef,
    result_media_type: &str,
) -> Result<FileRef> {
    let asset = resolve_input(ctx, input).await?;
    let body = payload(options, asset.to_json())?;
    submit(ctx, endpoint, body, result_media_type).await
}

fn temp_path(ctx: &ExecutionContext, media_type: &str) -> PathBuf {
    let ext = extension_for_media_type(media_type).unwrap_or("bin");
    ctx.config()
        .temp_dir()
        .join(format!("{}.{ext}", uuid::Uuid::new_v4()))
}

async fn stage_bytes(ctx: &ExecutionContext, bytes: &[u8], media_type: &str) -> Result<FileRef> {
    let path = temp_path(ctx, media_type);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, bytes).await?;
    Ok(FileRef::from_operation_result(path, media_type))
}

/// Downloads the asset named by a terminal status document. Operations that
/// report their result inline (document properties) have it written as JSON.
async fn stage_from_status(
    ctx: &ExecutionContext,
    status: &Value,
    media_type: &str,
    job_id: &str,
) -> Result<FileRef> {
    let download = status
        .pointer("/asset/downloadUri")
        .or_else(|| status.pointer("/resource/downloadUri"))
        .and_then(Value::as_str);
    if let Some(uri) = download {
        let path = temp_path(ctx, media_type);
        ctx.client().download(uri, &path).await?;
        return Ok(FileRef::from_operation_result(path, media_type));
    }
    if media_type == pdfops_io::media_type::JSON
        && let Some(metadata) = status.get("metadata")
    {
        let bytes = serde_json::to_vec_pretty(metadata)?;
        return stage_bytes(ctx, &bytes, media_type).await;
    }
    Err(PdfOpsError::service_api(
        "operation finished without a downloadable result",
        Some(job_id.to_string()),
        None,
        None,
    ))
}
