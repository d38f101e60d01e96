//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use notabook_auth::Capability;
use notabook_entity::session::SessionIdentity;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token and session expiry.
    pub expires_at: DateTime<Utc>,
    /// The authenticated caller.
    pub user: MeResponse,
}

/// The caller and what they may do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// Session identity.
    #[serde(flatten)]
    pub identity: SessionIdentity,
    /// Capabilities granted by the role.
    pub capabilities: Vec<Capability>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Next folio preview for the create form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextFolioResponse {
    /// Zero-padded folio.
    pub folio: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Server version.
    pub version: String,
}
