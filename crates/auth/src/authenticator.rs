//! Session-token authenticator.
//!
//! Responsibilities:
//! - Exchange long-lived [`Credentials`] for a short-lived bearer token.
//! - Cache the token until its margin-adjusted expiry.
//! - Serialize refreshes so concurrent callers share a single exchange.
//! - Keep the previous token when a refresh fails.

use crate::Credentials;
use async_trait::async_trait;
use pdfops_types::{PdfOpsError, Result, SessionToken, TokenProvider, headers};
use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;

/// Exchanges [`Credentials`] for session tokens against the identity service.
pub struct ServiceTokenAuthenticator {
    credentials: Arc<Credentials>,
    http: Client,
    app_info: String,
    /// Held across the token exchange; this is what makes refresh single-flight.
    token: Mutex<Option<SessionToken>>,
}

impl ServiceTokenAuthenticator {
    pub fn new(credentials: Arc<Credentials>, http: Client, app_info: impl Into<String>) -> Self {
        Self {
            credentials,
            http,
            app_info: app_info.into(),
            token: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the cached token without touching the network, if any.
    pub async fn cached_token(&self) -> Option<SessionToken> {
        self.token.lock().await.clone()
    }

    /// Seeds the cache, e.g. with a token persisted by a previous process.
    pub async fn set_token(&self, token: SessionToken) {
        *self.token.lock().await = Some(token);
    }

    async fn refresh_session_token(&self) -> Result<SessionToken> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let body = self.credentials.token_request_body()?;
        tracing::debug!(
            request_id = %request_id,
            uri = %self.credentials.ims_uri(),
            "requesting session token"
        );

        let resp = self
            .http
            .post(self.credentials.ims_uri())
            .header(headers::REQUEST_ID, &request_id)
            .header(headers::APP_INFO, &self.app_info)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let echoed_id = resp
            .headers()
            .get(headers::REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = resp.text().await?;
        let json: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if status == 200 {
            let token = parse_token_response(&json, echoed_id)?;
            tracing::info!(
                request_id = %request_id,
                valid_for_secs = token.remaining().as_secs(),
                "session token refreshed"
            );
            return Ok(token);
        }

        let error_code = json
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string);
        let message = json
            .get("error_description")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| error_code.clone())
            .unwrap_or_else(|| format!("token exchange failed with status {status}"));
        tracing::warn!(
            request_id = %request_id,
            status,
            error = ?error_code,
            "session token exchange rejected"
        );
        Err(PdfOpsError::service_api(
            message,
            echoed_id,
            Some(status),
            error_code,
        ))
    }
}

/// Parses `{access_token, expires_in}`; `expires_in` is in milliseconds.
///
/// # Errors
///
/// Returns [`PdfOpsError::ServiceApi`] if `access_token` is missing.
pub fn parse_token_response(json: &Value, request_id: Option<String>) -> Result<SessionToken> {
    let access_token = json
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PdfOpsError::service_api(
                "missing access_token in token response",
                request_id,
                Some(200),
                None,
            )
        })?;
    let expires_in = json
        .get("expires_in")
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        })
        .unwrap_or_else(|| {
            tracing::warn!("token response carries no expires_in, token will be single-use");
            0
        });
    Ok(SessionToken::from_ttl(
        access_token,
        Duration::from_millis(expires_in),
    ))
}

#[async_trait]
impl TokenProvider for ServiceTokenAuthenticator {
    async fn session_token(&self, force_refresh: bool) -> Result<SessionToken> {
        let mut guard = self.token.lock().await;
        if !force_refresh
            && let Some(token) = guard.as_ref()
            && !token.is_expired()
        {
            return Ok(token.clone());
        }
        // On failure the previous token stays in place.
        let token = self.refresh_session_token().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self, stale: &SessionToken) -> Result<SessionToken> {
        let mut guard = self.token.lock().await;
        if let Some(current) = guard.as_ref()
            && current.access_token != stale.access_token
            && !current.is_expired()
        {
            // Another caller already replaced the rejected token.
            return Ok(current.clone());
        }
        let token = self.refresh_session_token().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    fn client_id(&self) -> &str {
        self.credentials.client_id()
    }
}
