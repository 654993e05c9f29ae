//! Credentials and session-token authentication for the pdfops client.
//!
//! [`Credentials`] describes how to obtain a token; the
//! [`ServiceTokenAuthenticator`] exchanges them with the identity service,
//! caches the resulting [`SessionToken`](pdfops_types::SessionToken) and
//! refreshes it on expiry.

pub mod authenticator;
pub mod credentials;

pub use authenticator::ServiceTokenAuthenticator;
pub use credentials::{Credentials, Grant};
