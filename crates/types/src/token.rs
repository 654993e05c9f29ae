//! Session token representation and expiry logic.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Safety margin subtracted from the server-declared lifetime.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// A short-lived bearer token obtained from the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub access_token: String,
    /// Unix timestamp in milliseconds after which the token must not be used.
    pub expires_at: u64,
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis()
        .try_into()
        .unwrap_or(u64::MAX)
}

impl SessionToken {
    /// Creates a token whose expiry is `now + ttl - 60s`.
    pub fn from_ttl(access_token: impl Into<String>, ttl: Duration) -> Self {
        let ttl_ms: u64 = ttl.as_millis().try_into().unwrap_or(u64::MAX);
        let margin_ms: u64 = EXPIRY_MARGIN.as_millis().try_into().unwrap_or(u64::MAX);
        Self {
            access_token: access_token.into(),
            expires_at: now_millis().saturating_add(ttl_ms).saturating_sub(margin_ms),
        }
    }

    /// Return `true` once the margin-adjusted expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        now_millis() > self.expires_at
    }

    /// Time left before [`Self::is_expired`] flips, zero if already expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(now_millis()))
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}
