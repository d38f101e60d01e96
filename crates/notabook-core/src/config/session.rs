//! Session lifetime configuration.

use serde::{Deserialize, Serialize};

/// Longest accepted session lifetime: one year.
pub const MAX_TTL_HOURS: u64 = 24 * 366;

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hours a session (and its access token) stays valid after login.
    /// Must be in `1..=MAX_TTL_HOURS`.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_ttl_hours() -> u64 {
    12
}
