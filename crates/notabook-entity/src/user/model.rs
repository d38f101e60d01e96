//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notabook_core::types::UserId;

use super::role::UserRole;

/// A staff account.
///
/// Users are never physically deleted; deactivation clears `active`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique (compared case-insensitively).
    pub email: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
    /// Whether the account may log in.
    pub active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.active
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
    /// Initial active flag.
    pub active: bool,
}

/// Full replacement of a user's mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUser {
    /// The user to update.
    pub id: UserId,
    /// New display name.
    pub name: String,
    /// New email.
    pub email: String,
    /// New role.
    pub role: UserRole,
    /// New active flag.
    pub active: bool,
    /// Replacement password hash, if the password changes.
    pub password_hash: Option<String>,
}
