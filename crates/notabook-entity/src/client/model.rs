//! Client entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notabook_core::types::ClientId;

/// A billed customer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    /// Unique client identifier.
    pub id: ClientId,
    /// Business or person name.
    pub name: String,
    /// Contact email, unique.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Tax identifier (RFC).
    pub rfc: Option<String>,
    /// Stored logo reference (path or URL).
    pub logo_path: Option<String>,
    /// Current public share token, if one was issued.
    pub share_token: Option<String>,
    /// When the client was created.
    pub created_at: DateTime<Utc>,
    /// When the client was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Public projection: everything except the share token.
    pub fn without_token(mut self) -> Self {
        self.share_token = None;
        self
    }
}

/// Writable client fields, shared by create and update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientInput {
    /// Business or person name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Tax identifier (RFC).
    #[serde(default)]
    pub rfc: Option<String>,
    /// Logo reference.
    #[serde(default)]
    pub logo_path: Option<String>,
}
