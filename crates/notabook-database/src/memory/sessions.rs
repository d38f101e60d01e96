use async_trait::async_trait;
use chrono::Utc;

use notabook_core::result::AppResult;
use notabook_core::types::SessionId;
use notabook_entity::session::{CreateSession, Session};

use super::MemoryStore;
use crate::traits::SessionStore;

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, data: &CreateSession) -> AppResult<Session> {
        let mut state = self.lock().await?;
        let session = Session {
            id: data.id,
            user_id: data.user_id,
            role: data.role,
            created_at: Utc::now(),
            expires_at: data.expires_at,
            revoked_at: None,
        };
        state.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>> {
        let state = self.lock().await?;
        Ok(state.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn revoke(&self, id: SessionId) -> AppResult<()> {
        let mut state = self.lock().await?;
        if let Some(session) = state
            .sessions
            .iter_mut()
            .find(|s| s.id == id && s.revoked_at.is_none())
        {
            session.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}
