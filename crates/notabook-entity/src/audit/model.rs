//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use notabook_core::types::{AuditLogId, UserId};

use super::action::{AuditAction, EntityType};

/// An immutable audit log entry. Entries are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: AuditLogId,
    /// The user who performed the action.
    pub actor_id: UserId,
    /// The actor's name at the time of the query (joined, may be absent).
    #[sqlx(default)]
    pub actor_name: Option<String>,
    /// The action that was performed.
    pub action: AuditAction,
    /// The type of entity touched.
    pub entity_type: EntityType,
    /// The entity touched, if any.
    pub entity_id: Option<Uuid>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append an audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The user who performed the action.
    pub actor_id: UserId,
    /// The action performed.
    pub action: AuditAction,
    /// The type of entity touched.
    pub entity_type: EntityType,
    /// The entity touched.
    pub entity_id: Option<Uuid>,
}

impl CreateAuditLogEntry {
    /// Build an entry for an action on a specific entity.
    pub fn new(
        actor_id: UserId,
        action: AuditAction,
        entity_type: EntityType,
        entity_id: impl Into<Uuid>,
    ) -> Self {
        Self {
            actor_id,
            action,
            entity_type,
            entity_id: Some(entity_id.into()),
        }
    }
}
