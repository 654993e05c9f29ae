//! Authenticated request execution.
//!
//! Eliminates duplicated header → send → status-check logic across the
//! operation orchestrators. A 401 on an authenticated call triggers exactly
//! one token refresh and one replay; every other failure propagates.

use crate::request::{RequestBody, ResponseContent, ServiceRequest, ServiceResponse, parse_content};
use pdfops_config::ClientConfig;
use pdfops_types::{PdfOpsError, Result, SessionToken, TokenProvider, headers};
use reqwest::{
    Client, RequestBuilder,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde_json::Value;
use std::sync::Arc;
use tokio::time::Instant;

/// Service error codes that signal a quota or plan-limit rejection.
pub const QUOTA_ERROR_CODES: &[&str] = &[
    "QUOTA_EXCEEDED",
    "INSUFFICIENT_QUOTA",
    "TRANSACTION_LIMIT_EXCEEDED",
];

/// Executes service calls on behalf of one execution context.
#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    auth: Arc<dyn TokenProvider>,
    config: Arc<ClientConfig>,
}

impl ServiceClient {
    /// Builds a client whose HTTP timeouts come from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Config`] if the HTTP client cannot be constructed.
    pub fn new(auth: Arc<dyn TokenProvider>, config: ClientConfig) -> Result<Self> {
        let http = Self::build_http(&config)?;
        Ok(Self::with_http(http, auth, config))
    }

    /// Wraps an existing HTTP client (shared with the authenticator).
    #[must_use]
    pub fn with_http(http: Client, auth: Arc<dyn TokenProvider>, config: ClientConfig) -> Self {
        Self {
            http,
            auth,
            config: Arc::new(config),
        }
    }

    /// The reqwest client configured from [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::Config`] if TLS or timeouts cannot be set up.
    pub fn build_http(config: &ClientConfig) -> Result<Client> {
        Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .map_err(|e| PdfOpsError::Config(format!("failed to create http client: {e}")))
    }

    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `req`, refreshing the token and replaying once on a 401, and
    /// maps non-2xx responses to typed errors.
    ///
    /// # Errors
    ///
    /// Returns [`PdfOpsError::ServiceApi`] / [`PdfOpsError::ServiceUsage`] on
    /// non-success statuses, [`PdfOpsError::Timeout`] when the connection or
    /// read times out and [`PdfOpsError::Http`] on other transport failures.
    pub async fn call(&self, req: ServiceRequest) -> Result<ServiceResponse> {
        let resp = if req.authenticated {
            let token = self.auth.session_token(false).await?;
            let resp = self.send_once(&req, Some(&token)).await?;
            if resp.status == 401 {
                tracing::info!(
                    request_id = %resp.request_id,
                    uri = %req.uri,
                    "access token rejected, refreshing and retrying once"
                );
                let fresh = self.auth.invalidate(&token).await?;
                self.send_once(&req, Some(&fresh)).await?
            } else {
                resp
            }
        } else {
            self.send_once(&req, None).await?
        };

        if resp.is_success() {
            Ok(resp)
        } else {
            Err(error_from_response(&resp))
        }
    }

    /// Sends one attempt without interpreting the status.
    async fn send_once(
        &self,
        req: &ServiceRequest,
        token: Option<&SessionToken>,
    ) -> Result<ServiceResponse> {
        let request_id = req
            .headers
            .get(headers::REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);

        let mut builder = self
            .http
            .request(req.method.clone(), &req.uri)
            .headers(req.headers.clone())
            .header(headers::REQUEST_ID, &request_id)
            .header(headers::APP_INFO, &self.config.app_info);
        if let Some(token) = token {
            builder = builder
                .header(AUTHORIZATION, token.bearer())
                .header(headers::API_KEY, self.auth.client_id());
        }
        builder = attach_body(builder, &req.body);

        tracing::debug!(
            method = %req.method,
            uri = %req.uri,
            request_id = %request_id,
            "sending service request"
        );
        let started = Instant::now();
        let resp = builder
            .send()
            .await
            .map_err(|e| transport_error(e, &request_id, started))?;

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let echoed = headers
            .get(headers::REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp
            .bytes()
            .await
            .map_err(|e| transport_error(e, &request_id, started))?;

        Ok(ServiceResponse {
            status,
            content: parse_content(content_type.as_deref(), body),
            headers,
            request_id: echoed.unwrap_or(request_id),
        })
    }
}

/// A transport-level timeout becomes [`PdfOpsError::Timeout`] so callers can
/// tell it apart from a rejected request.
fn transport_error(e: reqwest::Error, request_id: &str, started: Instant) -> PdfOpsError {
    if e.is_timeout() {
        PdfOpsError::Timeout {
            request_tracking_id: request_id.to_string(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    } else {
        e.into()
    }
}

fn attach_body(builder: RequestBuilder, body: &RequestBody) -> RequestBuilder {
    match body {
        RequestBody::Empty => builder,
        RequestBody::Json(v) => builder.json(v),
        RequestBody::Form(s) => builder
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(s.clone()),
        RequestBody::Bytes { content_type, data } => builder
            .header(CONTENT_TYPE, content_type.as_str())
            .body(data.clone()),
    }
}

/// Extracts `(error_code, message)` from the common error body shapes:
/// `{"error": {"code", "message"}}`, `{"error": "...", "error_description"}`
/// and `{"code", "message"}`.
#[must_use]
pub fn error_details(json: &Value) -> (Option<String>, Option<String>) {
    let nested = json.get("error").filter(|e| e.is_object());
    let code = nested
        .and_then(|e| e.get("code"))
        .or_else(|| json.get("error").filter(|e| e.is_string()))
        .or_else(|| json.get("code"))
        .or_else(|| json.get("errorCode"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let message = nested
        .and_then(|e| e.get("message"))
        .or_else(|| json.get("message"))
        .or_else(|| json.get("error_description"))
        .and_then(Value::as_str)
        .map(str::to_string);
    (code, message)
}

/// Builds a service error, routing quota rejections to [`PdfOpsError::ServiceUsage`].
#[must_use]
pub fn service_error(
    message: String,
    request_id: String,
    status: u16,
    code: Option<String>,
) -> PdfOpsError {
    let is_quota = status == 429
        || code
            .as_deref()
            .is_some_and(|c| QUOTA_ERROR_CODES.contains(&c));
    if is_quota {
        PdfOpsError::service_usage(message, Some(request_id), Some(status), code)
    } else {
        PdfOpsError::service_api(message, Some(request_id), Some(status), code)
    }
}

/// Maps a non-success response to a typed error.
#[must_use]
pub fn error_from_response(resp: &ServiceResponse) -> PdfOpsError {
    let (code, message) = match &resp.content {
        ResponseContent::Json(v) => error_details(v),
        _ => (None, None),
    };
    let message = message
        .or_else(|| match &resp.content {
            ResponseContent::Text(t) if !t.is_empty() => Some(t.clone()),
            _ => None,
        })
        .unwrap_or_else(|| format!("service returned status {}", resp.status));
    tracing::warn!(
        status = resp.status,
        request_id = %resp.request_id,
        code = ?code,
        "service call failed"
    );
    service_error(message, resp.request_id.clone(), resp.status, code)
}
