//! Configuration loading for the pdfops client.
//!
//! Uses figment for YAML-based client settings with sensible defaults, and
//! for the JSON credentials file (overridable from `PDFOPS_*` environment
//! variables).

pub mod credentials;
pub mod schema;

pub use credentials::{CredentialsFile, DEFAULT_API_BASE_URI, DEFAULT_IMS_URI};
pub use schema::{ClientConfig, Config, LogConfig, LogFormat};
