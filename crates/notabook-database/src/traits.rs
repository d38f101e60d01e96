//! Store traits the service layer programs against.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory one in [`crate::memory`]. Methods that take a
//! [`CreateAuditLogEntry`] write it in the same atomic unit as the data
//! change: either both are committed or neither is.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use notabook_core::result::AppResult;
use notabook_core::types::{ClientId, NoteId, PageRequest, PageResponse, SessionId, UserId};
use notabook_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry, EntityType};
use notabook_entity::client::{Client, ClientInput};
use notabook_entity::note::{
    Folio, LineItem, NewNote, Note, NoteChanges, NoteStatus, NoteSummary,
};
use notabook_entity::session::{CreateSession, Session};
use notabook_entity::user::{CreateUser, UpdateUser, User};

use crate::filter::{AuditFilter, CountBy, NoteFilter, NoteStats};

/// Staff accounts and credentials.
#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users, newest first.
    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>>;

    /// Insert a user. Duplicate email yields `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Replace a user's mutable fields. Duplicate email yields `Conflict`.
    async fn update(&self, data: &UpdateUser) -> AppResult<User>;

    /// Flip the active flag.
    async fn set_active(&self, id: UserId, active: bool) -> AppResult<User>;
}

/// Billed customers and their share tokens.
#[async_trait]
pub trait ClientStore: Send + Sync + Debug {
    /// Find a client by primary key.
    async fn find_by_id(&self, id: ClientId) -> AppResult<Option<Client>>;

    /// Find the client currently bound to a share token.
    async fn find_by_share_token(&self, token: &str) -> AppResult<Option<Client>>;

    /// List clients by name, optionally filtered by a search term
    /// (name, email, or RFC).
    async fn list(&self, search: Option<&str>, page: &PageRequest)
    -> AppResult<PageResponse<Client>>;

    /// The most recently created clients.
    async fn recent(&self, limit: u64) -> AppResult<Vec<Client>>;

    /// Number of clients.
    async fn count(&self) -> AppResult<i64>;

    /// Insert a client. Duplicate email yields `Conflict`.
    async fn create(&self, data: &ClientInput) -> AppResult<Client>;

    /// Replace a client's writable fields.
    async fn update(&self, id: ClientId, data: &ClientInput) -> AppResult<Client>;

    /// Delete a client. Refused with `Conflict` while any note references it.
    async fn delete(&self, id: ClientId) -> AppResult<()>;

    /// Overwrite the client's share token. The previous token stops
    /// resolving immediately.
    async fn set_share_token(&self, id: ClientId, token: &str) -> AppResult<Client>;
}

/// Notes and their line items. Every mutation is one atomic unit together
/// with its audit entry.
#[async_trait]
pub trait NoteStore: Send + Sync + Debug {
    /// The folio the next successful create would receive.
    async fn peek_next_folio(&self) -> AppResult<Folio>;

    /// Allocate a folio and insert the note, its line items and the audit
    /// entry. On failure nothing is written and no folio is consumed.
    async fn create(&self, note: &NewNote, audit: &CreateAuditLogEntry) -> AppResult<Note>;

    /// Replace scalar fields and the full line item set. The folio is kept.
    async fn update(&self, changes: &NoteChanges, audit: &CreateAuditLogEntry) -> AppResult<Note>;

    /// Set only the status.
    async fn set_status(
        &self,
        id: NoteId,
        status: NoteStatus,
        audit: &CreateAuditLogEntry,
    ) -> AppResult<Note>;

    /// Delete the line items and the note.
    async fn delete(&self, id: NoteId, audit: &CreateAuditLogEntry) -> AppResult<()>;

    /// Find a note by primary key.
    async fn find_by_id(&self, id: NoteId) -> AppResult<Option<Note>>;

    /// Line items ordered by `line_no`.
    async fn line_items(&self, id: NoteId) -> AppResult<Vec<LineItem>>;

    /// List notes newest first.
    async fn list(
        &self,
        filter: &NoteFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NoteSummary>>;

    /// Counts and the paid total of notes created since `since`.
    async fn stats(&self, since: DateTime<Utc>) -> AppResult<NoteStats>;
}

/// Append-only audit log.
#[async_trait]
pub trait AuditStore: Send + Sync + Debug {
    /// Append one entry on its own.
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;

    /// Search newest first.
    async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>>;

    /// Entries since `since`, counted per action, most frequent first.
    async fn count_by_action(&self, since: DateTime<Utc>) -> AppResult<Vec<CountBy<AuditAction>>>;

    /// Entries since `since`, counted per entity type, most frequent first.
    async fn top_entity_types(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<CountBy<EntityType>>>;
}

/// Server-side login sessions.
#[async_trait]
pub trait SessionStore: Send + Sync + Debug {
    /// Insert a session.
    async fn create(&self, data: &CreateSession) -> AppResult<Session>;

    /// Find a session by primary key.
    async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>>;

    /// Mark a session revoked. Revoking twice is a no-op.
    async fn revoke(&self, id: SessionId) -> AppResult<()>;
}
