//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notabook_core::types::{SessionId, UserId};

use crate::user::UserRole;

/// A server-side login session. The access token references it by id, so
/// revoking the row invalidates the token.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// Role snapshot taken at login.
    pub role: UserRole,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// When the session was revoked by logout.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session is usable at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }

    /// Check whether the session is usable right now.
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// Pre-generated identifier, embedded in the access token.
    pub id: SessionId,
    /// The user this session belongs to.
    pub user_id: UserId,
    /// Role snapshot.
    pub role: UserRole,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> Session {
        let now = Utc::now();
        Session {
            id: SessionId::new(),
            user_id: UserId::new(),
            role: UserRole::Secretary,
            created_at: now,
            expires_at: now + expires_in,
            revoked_at: revoked.then_some(now),
        }
    }

    #[test]
    fn test_activity() {
        assert!(session(Duration::hours(1), false).is_active());
        assert!(!session(Duration::hours(1), true).is_active());
        assert!(!session(Duration::seconds(-1), false).is_active());
    }
}
