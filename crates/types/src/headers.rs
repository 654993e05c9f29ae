//! Header names and values shared by the identity and operation endpoints.

/// Per-request tracking id, echoed back by the service.
pub const REQUEST_ID: &str = "x-request-id";

/// Identifies the calling SDK to the service.
pub const APP_INFO: &str = "x-api-app-info";

/// Client id accompanying the bearer token.
pub const API_KEY: &str = "x-api-key";

/// Default `x-api-app-info` value.
pub const DEFAULT_APP_INFO: &str = concat!("pdfops-rust-sdk-", env!("CARGO_PKG_VERSION"));

/// Returns the job id embedded as the last path segment of a polling
/// location, or the unavailable sentinel.
#[must_use]
pub fn request_id_from_location(location: Option<&str>) -> String {
    location
        .and_then(|l| l.trim_end_matches('/').rsplit('/').next())
        .filter(|s| !s.is_empty())
        .map_or_else(
            || crate::error::REQUEST_ID_UNAVAILABLE.to_string(),
            str::to_string,
        )
}
