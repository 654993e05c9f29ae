//! Request execution layer for the PDF service.
//!
//! [`ServiceClient`] attaches the standard headers, refreshes the session
//! token once on a 401, maps failures to [`pdfops_types::PdfOpsError`],
//! polls asynchronous jobs and streams assets to and from pre-signed URIs.

pub mod client;
pub mod poll;
pub mod request;
pub mod transfer;

pub use client::{QUOTA_ERROR_CODES, ServiceClient, error_from_response};
pub use poll::{JobStatus, parse_job_status};
pub use request::{RequestBody, ResponseContent, ServiceRequest, ServiceResponse};
pub use transfer::require_uri;
