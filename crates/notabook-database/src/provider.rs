//! Store bundle that dispatches to the configured backend.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use notabook_core::config::{DatabaseConfig, StoreProvider};
use notabook_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    AuditLogRepository, ClientRepository, NoteRepository, SessionRepository, UserRepository,
};
use crate::traits::{AuditStore, ClientStore, NoteStore, SessionStore, UserStore};

/// Every store the services need, selected once at startup.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Staff accounts.
    pub users: Arc<dyn UserStore>,
    /// Clients and share tokens.
    pub clients: Arc<dyn ClientStore>,
    /// Notes, line items, and the folio counter.
    pub notes: Arc<dyn NoteStore>,
    /// Audit log.
    pub audit: Arc<dyn AuditStore>,
    /// Login sessions.
    pub sessions: Arc<dyn SessionStore>,
}

impl Stores {
    /// Build the stores for the configured provider. For PostgreSQL this
    /// connects the pool and, if enabled, runs pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            StoreProvider::Memory => {
                info!("Initializing in-memory store");
                Ok(Self::memory(MemoryStore::new()))
            }
            StoreProvider::Postgres => {
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                Ok(Self::postgres(db.into_pool()))
            }
        }
    }

    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            clients: Arc::new(ClientRepository::new(pool.clone())),
            notes: Arc::new(NoteRepository::new(pool.clone())),
            audit: Arc::new(AuditLogRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool)),
        }
    }

    /// Stores sharing one in-memory backend.
    pub fn memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            clients: Arc::new(store.clone()),
            notes: Arc::new(store.clone()),
            audit: Arc::new(store.clone()),
            sessions: Arc::new(store),
        }
    }
}
