//! Session repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use notabook_core::result::AppResult;
use notabook_core::types::SessionId;
use notabook_entity::session::{CreateSession, Session};

use super::storage_error;
use crate::traits::SessionStore;

/// Repository for server-side login sessions.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, user_id, role, expires_at) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(data.role)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("Failed to create session"))
    }

    async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to find session"))
    }

    async fn revoke(&self, id: SessionId) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error("Failed to revoke session"))?;
        Ok(())
    }
}
