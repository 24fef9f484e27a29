//! API key credential for Mealie.
//!
//! Mealie accepts long-lived API tokens created under the user profile. The
//! token is sent as `Authorization: Bearer <token>` on every request; there is
//! no login exchange and nothing to refresh.

use std::fmt;

/// A Mealie API token.
///
/// `Debug` never prints the secret, so the key can sit inside configuration
/// structs that end up in log output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// First few characters followed by an ellipsis, for diagnostics.
    pub fn preview(&self) -> String {
        let cut = self
            .0
            .char_indices()
            .nth(6)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        format!("{}...", &self.0[..cut])
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"<redacted>").finish()
    }
}
