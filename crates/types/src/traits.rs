//! Async traits shared across pdfops crates.
//!
//! The execution layer depends only on these abstractions, so the HTTP
//! client can be driven by the real authenticator or by a stub in tests.

use crate::{Result, SessionToken};
use async_trait::async_trait;

/// Supplies bearer tokens for authenticated service calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a usable session token.
    ///
    /// A cached, unexpired token is returned without a network call unless
    /// `force_refresh` is set.
    async fn session_token(&self, force_refresh: bool) -> Result<SessionToken>;

    /// Report that the service rejected `stale` and obtain a replacement.
    ///
    /// Implementations should avoid a second exchange when the cached token
    /// has already moved on from `stale`.
    async fn invalidate(&self, stale: &SessionToken) -> Result<SessionToken> {
        let _ = stale;
        self.session_token(true).await
    }

    /// The client id sent alongside the bearer token as `x-api-key`.
    fn client_id(&self) -> &str;
}
