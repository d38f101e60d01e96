//! Query filters and aggregate rows shared by every store backend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use notabook_core::types::{ClientId, UserId};
use notabook_entity::audit::{AuditAction, EntityType};
use notabook_entity::note::NoteStatus;

/// Filter for note listings. Results are always newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteFilter {
    /// Only notes billed to this client.
    pub client_id: Option<ClientId>,
    /// Only notes in this status.
    pub status: Option<NoteStatus>,
    /// Case-insensitive match against folio, description, or client name.
    pub search: Option<String>,
}

impl NoteFilter {
    /// All notes of one client.
    pub fn for_client(client_id: ClientId) -> Self {
        Self {
            client_id: Some(client_id),
            ..Self::default()
        }
    }

    /// The search term as a SQL `ILIKE` pattern, if any.
    pub fn search_pattern(&self) -> Option<String> {
        like_pattern(self.search.as_deref())
    }
}

/// Filter for audit log browsing. Results are always newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Only entries by this actor.
    pub actor_id: Option<UserId>,
    /// Only entries of this action.
    pub action: Option<AuditAction>,
    /// Only entries touching this entity type.
    pub entity_type: Option<EntityType>,
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub to: Option<DateTime<Utc>>,
}

impl AuditFilter {
    /// Whether an entry with these attributes passes the filter.
    pub fn matches(
        &self,
        actor_id: UserId,
        action: AuditAction,
        entity_type: EntityType,
        created_at: DateTime<Utc>,
    ) -> bool {
        self.actor_id.is_none_or(|a| a == actor_id)
            && self.action.is_none_or(|a| a == action)
            && self.entity_type.is_none_or(|t| t == entity_type)
            && self.from.is_none_or(|from| created_at >= from)
            && self.to.is_none_or(|to| created_at < to)
    }
}

/// Aggregate note figures for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteStats {
    /// Number of notes.
    pub total_notes: i64,
    /// Number of notes in `pendiente`.
    pub pending_notes: i64,
    /// Sum of `pagada` note totals created at or after the cutoff.
    pub paid_total_since: Decimal,
}

/// Count of audit entries grouped by one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBy<K> {
    /// Group key.
    pub key: K,
    /// Number of entries.
    pub count: i64,
}

/// Build a `%term%` pattern, escaping `ILIKE` metacharacters.
pub(crate) fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

/// Case-insensitive substring match used by the in-memory backend.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}
