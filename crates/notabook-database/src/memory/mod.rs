//! In-memory store backend.
//!
//! All data lives behind one `tokio::sync::Mutex`. Each trait method holds
//! the lock for its whole duration, validates every step against the current
//! state, and only then applies its writes, so a failed operation leaves no
//! trace. Suitable for tests and single-process demos only.

mod audit;
mod clients;
mod notes;
mod sessions;
mod users;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};

use notabook_core::error::AppError;
use notabook_core::result::AppResult;
use notabook_core::types::AuditLogId;
use notabook_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use notabook_entity::client::Client;
use notabook_entity::note::{LineItem, Note};
use notabook_entity::session::Session;
use notabook_entity::user::User;

/// Rows held by the in-memory store, in insertion order.
#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    clients: Vec<Client>,
    notes: Vec<Note>,
    line_items: Vec<LineItem>,
    audit_log: Vec<AuditLogEntry>,
    sessions: Vec<Session>,
    folio_counter: i64,
}

/// Failure switches for exercising error paths.
#[derive(Debug, Default)]
struct Faults {
    unavailable: AtomicBool,
    audit_unavailable: AtomicBool,
}

/// Process-local implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    faults: Arc<Faults>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with `StorageUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.faults.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make every audit write fail, both standalone and inside atomic units.
    pub fn set_audit_unavailable(&self, unavailable: bool) {
        self.faults
            .audit_unavailable
            .store(unavailable, Ordering::SeqCst);
    }

    /// Number of audit entries held, regardless of filters.
    pub async fn audit_len(&self) -> usize {
        self.state.lock().await.audit_log.len()
    }

    async fn lock(&self) -> AppResult<MutexGuard<'_, State>> {
        if self.faults.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage_unavailable("Store is unavailable"));
        }
        Ok(self.state.lock().await)
    }

    /// Build the audit row an atomic unit will append, or fail the unit.
    fn stage_audit(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        if self.faults.audit_unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage_unavailable("Audit log is unavailable"));
        }
        Ok(AuditLogEntry {
            id: AuditLogId::new(),
            actor_id: entry.actor_id,
            actor_name: None,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            created_at: Utc::now(),
        })
    }
}
