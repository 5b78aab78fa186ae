//! Bearer credentials attached to the opening handshake.
//!
//! The client never interprets tokens. It only turns them into the
//! header pair the game services expect. Where the tokens come from
//! (login, refresh, storage) is the caller's business.

use std::fmt;

use broadside_transport::Headers;

/// Header carrying the refresh token next to the bearer token.
pub const REFRESH_TOKEN_HEADER: &str = "Refresh-Token";

/// An access/refresh token pair.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Short-lived bearer token.
    pub access: String,
    /// Token the server may use to renew `access`.
    pub refresh: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Builds the handshake headers.
    ///
    /// Produces `Authorization: Bearer <access>` and
    /// `Refresh-Token: <refresh>`, or no headers at all when there is no
    /// access token (an anonymous connection).
    pub fn headers(&self) -> Headers {
        if self.access.is_empty() {
            return Headers::new();
        }
        let mut headers = Headers::bearer(&self.access);
        headers.insert(REFRESH_TOKEN_HEADER, self.refresh.clone());
        headers
    }
}

// Tokens must not end up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}
