//! Core types and traits for the pdfops workspace.
//!
//! This crate defines the shared abstractions used across all layers of the
//! pdfops client, including the error taxonomy, the session token
//! representation, well-known wire header names, and the async trait the
//! authenticator implements for the execution layer.

pub mod error;
pub mod headers;
pub mod token;
pub mod traits;

pub use error::{PdfOpsError, Result};
pub use token::SessionToken;
pub use traits::TokenProvider;
