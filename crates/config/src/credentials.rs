//! On-disk credentials file.
//!
//! ```json
//! {
//!   "client_id": "...",
//!   "client_secret": "...",
//!   "auth_code": "...",
//!   "ims_uri": "https://ims-na1.adobelogin.com/ims/token/v1",
//!   "api_base_uri": "https://pdf-services.adobe.io"
//! }
//! ```
//!
//! Any field may be overridden with a `PDFOPS_<FIELD>` environment variable.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_IMS_URI: &str = "https://ims-na1.adobelogin.com/ims/token/v1";
pub const DEFAULT_API_BASE_URI: &str = "https://pdf-services.adobe.io";

fn default_ims_uri() -> String {
    DEFAULT_IMS_URI.to_string()
}
fn default_api_base_uri() -> String {
    DEFAULT_API_BASE_URI.to_string()
}

/// Raw credential fields as stored on disk.
///
/// Presence of `auth_code` selects the authorization-code exchange; otherwise
/// the client-credentials exchange is used.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsFile {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub auth_code: Option<String>,
    #[serde(default)]
    pub scopes: Option<String>,
    #[serde(default = "default_ims_uri")]
    pub ims_uri: String,
    #[serde(default = "default_api_base_uri")]
    pub api_base_uri: String,
}

impl std::fmt::Debug for CredentialsFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsFile")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_code", &self.auth_code.as_ref().map(|_| "[REDACTED]"))
            .field("scopes", &self.scopes)
            .field("ims_uri", &self.ims_uri)
            .field("api_base_uri", &self.api_base_uri)
            .finish()
    }
}

impl CredentialsFile {
    /// Parses credentials from a JSON string (no environment overrides).
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the JSON is invalid or a required field is missing.
    #[allow(clippy::result_large_err)]
    pub fn from_json(json: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Json},
        };
        Figment::from(Json::string(json)).extract()
    }

    /// Loads credentials from a JSON file, then applies `PDFOPS_*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read, parsed, or lacks
    /// a required field.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &Path) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Json},
        };
        Figment::from(Json::file(path))
            .merge(Env::prefixed("PDFOPS_").only(&[
                "client_id",
                "client_secret",
                "auth_code",
                "scopes",
                "ims_uri",
                "api_base_uri",
            ]))
            .extract()
    }
}
