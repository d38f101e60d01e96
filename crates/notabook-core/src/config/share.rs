//! Public share link configuration.

use serde::{Deserialize, Serialize};

/// Configuration for client share links (the QR code target).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Base URL prepended to `/api/public/{token}/notes` in issued links.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
        }
    }
}

impl ShareConfig {
    /// Build the public URL listing a client's notes for the given token.
    pub fn public_url(&self, token: &str) -> String {
        format!(
            "{}/api/public/{token}/notes",
            self.public_base_url.trim_end_matches('/')
        )
    }
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_trims_trailing_slash() {
        let config = ShareConfig {
            public_base_url: "https://notas.example.com/".to_string(),
        };
        assert_eq!(
            config.public_url("abc"),
            "https://notas.example.com/api/public/abc/notes"
        );
    }
}
