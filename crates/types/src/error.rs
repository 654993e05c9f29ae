//! Unified error type for the pdfops workspace.

use thiserror::Error;

/// Status code reported when a service failure carries no HTTP status.
pub const DEFAULT_STATUS_CODE: u16 = 0;

/// Error code reported when a service failure carries no error code.
pub const DEFAULT_ERROR_CODE: &str = "UNKNOWN";

/// Tracking id reported when the service did not echo one back.
pub const REQUEST_ID_UNAVAILABLE: &str = "UnknownRequestID";

/// Enumerates all error kinds that can occur across pdfops crates.
#[derive(Debug, Error)]
pub enum PdfOpsError {
    /// Bad or missing options / file-reference fields. Never sent over the network.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The API was used incorrectly (e.g. consuming a non-result file reference twice).
    #[error("usage error: {0}")]
    Usage(String),

    /// The remote service returned a declared error.
    #[error(
        "service api error: {message} (status={status_code}, code={error_code}, request_id={request_tracking_id})"
    )]
    ServiceApi {
        message: String,
        request_tracking_id: String,
        status_code: u16,
        error_code: String,
    },

    /// The remote service rejected the call for quota or plan-limit reasons.
    #[error(
        "service usage error: {message} (status={status_code}, code={error_code}, request_id={request_tracking_id})"
    )]
    ServiceUsage {
        message: String,
        request_tracking_id: String,
        status_code: u16,
        error_code: String,
    },

    /// An asynchronous operation did not reach a terminal status in time, or
    /// a single request timed out at the transport level.
    #[error("timed out after {elapsed_ms} ms (request_id={request_tracking_id})")]
    Timeout {
        request_tracking_id: String,
        elapsed_ms: u64,
    },

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(String),

    /// Local file system error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

// ── Feature-gated From impls ──────────────────────────────────────────────────

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for PdfOpsError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl PdfOpsError {
    /// Single-message validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Builds a [`PdfOpsError::ServiceApi`], substituting the documented
    /// defaults for missing status, code or tracking id.
    pub fn service_api(
        message: impl Into<String>,
        request_tracking_id: Option<String>,
        status_code: Option<u16>,
        error_code: Option<String>,
    ) -> Self {
        Self::ServiceApi {
            message: message.into(),
            request_tracking_id: request_tracking_id
                .unwrap_or_else(|| REQUEST_ID_UNAVAILABLE.to_string()),
            status_code: status_code.unwrap_or(DEFAULT_STATUS_CODE),
            error_code: error_code.unwrap_or_else(|| DEFAULT_ERROR_CODE.to_string()),
        }
    }

    /// Builds a [`PdfOpsError::ServiceUsage`] with the same defaulting rules.
    pub fn service_usage(
        message: impl Into<String>,
        request_tracking_id: Option<String>,
        status_code: Option<u16>,
        error_code: Option<String>,
    ) -> Self {
        Self::ServiceUsage {
            message: message.into(),
            request_tracking_id: request_tracking_id
                .unwrap_or_else(|| REQUEST_ID_UNAVAILABLE.to_string()),
            status_code: status_code.unwrap_or(DEFAULT_STATUS_CODE),
            error_code: error_code.unwrap_or_else(|| DEFAULT_ERROR_CODE.to_string()),
        }
    }

    /// Returns `true` for any error raised by the remote service, including
    /// quota rejections.
    #[must_use]
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::ServiceApi { .. } | Self::ServiceUsage { .. })
    }

    /// Returns `true` if the service rejected the bearer token.
    #[must_use]
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::ServiceApi { status_code: 401, .. })
    }

    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ServiceApi { status_code, .. } | Self::ServiceUsage { status_code, .. } => {
                Some(*status_code)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::ServiceApi { error_code, .. } | Self::ServiceUsage { error_code, .. } => {
                Some(error_code)
            }
            _ => None,
        }
    }

    /// The correlation id to quote when contacting service support.
    #[must_use]
    pub fn request_tracking_id(&self) -> Option<&str> {
        match self {
            Self::ServiceApi {
                request_tracking_id,
                ..
            }
            | Self::ServiceUsage {
                request_tracking_id,
                ..
            }
            | Self::Timeout {
                request_tracking_id,
                ..
            } => Some(request_tracking_id),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PdfOpsError>;
