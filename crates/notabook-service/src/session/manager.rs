//! Authentication and session lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use notabook_auth::{JwtDecoder, JwtEncoder, PasswordHasher};
use notabook_core::config::{AuthConfig, MAX_TTL_HOURS, SessionConfig};
use notabook_core::error::AppError;
use notabook_core::result::AppResult;
use notabook_core::types::SessionId;
use notabook_database::{SessionStore, UserStore};
use notabook_entity::audit::{AuditAction, EntityType};
use notabook_entity::session::{CreateSession, SessionIdentity};

use crate::audit::AuditLogger;

/// Message for every credential failure, so callers cannot tell an unknown
/// email from a wrong password or an inactive account.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// The established identity.
    pub identity: SessionIdentity,
    /// Signed bearer token referencing the session.
    pub access_token: String,
    /// When the session and token expire.
    pub expires_at: DateTime<Utc>,
}

/// Authenticates credentials and manages server-side sessions.
#[derive(Debug, Clone)]
pub struct AuthSessionManager {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    audit: AuditLogger,
    hasher: PasswordHasher,
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    session_ttl: Duration,
}

impl AuthSessionManager {
    /// Creates a new session manager.
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        audit: AuditLogger,
        auth: &AuthConfig,
        session: &SessionConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            audit,
            hasher: PasswordHasher::new(),
            encoder: JwtEncoder::new(auth),
            decoder: JwtDecoder::new(auth),
            session_ttl: Duration::hours(session.ttl_hours.min(MAX_TTL_HOURS) as i64),
        }
    }

    /// Verify credentials and open a session. Only active users with a
    /// matching password succeed.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let user = self.users.find_by_email(email).await?;
        // Unknown emails still pay for an Argon2 run.
        let verified = match &user {
            Some(u) => self.hasher.verify_password(password, &u.password_hash),
            None => self.hasher.verify_missing(password),
        };
        let user = user
            .filter(|u| verified && u.can_login())
            .ok_or_else(|| {
                info!(email = %email.trim(), "Login rejected");
                AppError::unauthenticated(INVALID_CREDENTIALS)
            })?;

        let expires_at = Utc::now() + self.session_ttl;
        let session = self
            .sessions
            .create(&CreateSession {
                id: SessionId::new(),
                user_id: user.id,
                role: user.role,
                expires_at,
            })
            .await?;

        let access_token = self.encoder.generate_access_token(
            user.id,
            session.id,
            session.role,
            &user.name,
            session.expires_at,
        )?;

        self.audit
            .record_best_effort(user.id, AuditAction::Login, EntityType::User, Some(user.id.into()))
            .await;

        info!(user_id = %user.id, session_id = %session.id, role = %user.role, "User logged in");
        Ok(LoginOutcome {
            identity: SessionIdentity {
                session_id: session.id,
                user_id: user.id,
                name: user.name,
                role: session.role,
            },
            access_token,
            expires_at: session.expires_at,
        })
    }

    /// Map a bearer token back to its identity. The session row must exist,
    /// belong to the token's subject, and be neither revoked nor expired.
    pub async fn resolve(&self, token: &str) -> AppResult<SessionIdentity> {
        let claims = self.decoder.decode_access_token(token)?;
        let session = self
            .sessions
            .find_by_id(claims.sid)
            .await?
            .filter(|s| s.user_id == claims.sub && s.is_active())
            .ok_or_else(|| AppError::unauthenticated("Session is no longer valid"))?;

        Ok(SessionIdentity {
            session_id: session.id,
            user_id: session.user_id,
            name: claims.name,
            role: session.role,
        })
    }

    /// Log out: record `logout`, then revoke the session.
    pub async fn destroy_session(&self, identity: &SessionIdentity) -> AppResult<()> {
        self.audit
            .record_best_effort(
                identity.user_id,
                AuditAction::Logout,
                EntityType::User,
                Some(identity.user_id.into()),
            )
            .await;
        self.sessions.revoke(identity.session_id).await?;
        info!(user_id = %identity.user_id, session_id = %identity.session_id, "User logged out");
        Ok(())
    }
}
