//! The authenticated caller passed explicitly into every core operation.

use serde::{Deserialize, Serialize};

use notabook_core::types::{SessionId, UserId};

use crate::user::UserRole;

/// Who is calling, with the role fixed at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Backing session row.
    pub session_id: SessionId,
    /// Authenticated user.
    pub user_id: UserId,
    /// Display name at login.
    pub name: String,
    /// Role snapshot.
    pub role: UserRole,
}

impl SessionIdentity {
    /// Check whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
