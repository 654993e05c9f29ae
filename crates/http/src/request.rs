//! Normalized request and response shapes for service calls.

use bytes::Bytes;
use reqwest::{
    Method,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;

/// Request payload. Every variant is cheap to clone so a request can be
/// replayed after a token refresh.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// Pre-encoded `application/x-www-form-urlencoded` body.
    Form(String),
    Bytes { content_type: String, data: Bytes },
}

/// A single call against the service.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: RequestBody,
    /// Attach `Authorization` / `x-api-key`. Pre-signed transfer URIs must not.
    pub authenticated: bool,
}

impl ServiceRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            authenticated: true,
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::POST, uri)
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    #[must_use]
    pub fn form(mut self, encoded: impl Into<String>) -> Self {
        self.body = RequestBody::Form(encoded.into());
        self
    }

    #[must_use]
    pub fn bytes(mut self, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.body = RequestBody::Bytes {
            content_type: content_type.into(),
            data: data.into(),
        };
        self
    }

    /// Adds a header; invalid names or values are dropped with a warning.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(n), Ok(v)) => {
                self.headers.insert(n, v);
            }
            _ => tracing::warn!(header = name, "dropping invalid request header"),
        }
        self
    }

    #[must_use]
    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

/// Parsed response content, chosen by the response `Content-Type`.
#[derive(Debug, Clone)]
pub enum ResponseContent {
    Empty,
    Json(Value),
    Text(String),
    Bytes(Bytes),
}

/// Normalized result of a service call.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub content: ResponseContent,
    /// Tracking id echoed by the service, or the one that was sent.
    pub request_id: String,
}

impl ServiceResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The polling URL of an asynchronous job.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        match &self.content {
            ResponseContent::Json(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Chooses how to parse a body from its `Content-Type`.
pub(crate) fn parse_content(content_type: Option<&str>, body: Bytes) -> ResponseContent {
    if body.is_empty() {
        return ResponseContent::Empty;
    }
    let ct = content_type.unwrap_or_default().to_ascii_lowercase();
    if ct.contains("json")
        && let Ok(v) = serde_json::from_slice(&body)
    {
        return ResponseContent::Json(v);
    }
    if ct.starts_with("text/") || ct.contains("json") {
        return ResponseContent::Text(String::from_utf8_lossy(&body).into_owned());
    }
    ResponseContent::Bytes(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_content_json() {
        let c = parse_content(
            Some("application/json; charset=utf-8"),
            Bytes::from_static(br#"{"status":"done"}"#),
        );
        assert!(matches!(c, ResponseContent::Json(v) if v == json!({"status": "done"})));
    }

    #[test]
    fn test_parse_content_invalid_json_falls_back_to_text() {
        let c = parse_content(Some("application/json"), Bytes::from_static(b"not json"));
        assert!(matches!(c, ResponseContent::Text(t) if t == "not json"));
    }

    #[test]
    fn test_parse_content_binary() {
        let c = parse_content(Some("application/pdf"), Bytes::from_static(b"%PDF-1.7"));
        assert!(matches!(c, ResponseContent::Bytes(_)));
    }

    #[test]
    fn test_parse_content_empty() {
        let c = parse_content(Some("application/json"), Bytes::new());
        assert!(matches!(c, ResponseContent::Empty));
    }

    #[test]
    fn test_request_builders() {
        let req = ServiceRequest::post("https://api.test/assets")
            .json(json!({"mediaType": "application/pdf"}))
            .header("x-custom", "1")
            .header("bad header", "x");
        assert_eq!(req.method, Method::POST);
        assert!(req.authenticated);
        assert_eq!(req.headers.len(), 1);
        assert!(matches!(req.body, RequestBody::Json(_)));
        assert!(!ServiceRequest::get("u").unauthenticated().authenticated);
    }
}
