//! The audit logger.
//!
//! Two write paths exist. [`AuditLogger::record_best_effort`] appends on its
//! own and never fails the caller. [`AuditLogger::record_transactional`]
//! only builds the entry; the note store writes it inside the same atomic
//! unit as the data change.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use notabook_auth::{Capability, PermissionEvaluator};
use notabook_core::error::{AppError, ErrorKind};
use notabook_core::result::AppResult;
use notabook_core::types::{PageRequest, PageResponse, UserId};
use notabook_database::AuditStore;
use notabook_database::filter::{AuditFilter, CountBy};
use notabook_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry, EntityType};
use notabook_entity::session::SessionIdentity;

/// How many entity types the weekly ranking keeps.
const TOP_ENTITY_TYPES: u64 = 5;

/// Audit activity summary for the log browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStats {
    /// Entries since midnight UTC, per action.
    pub today_by_action: Vec<CountBy<AuditAction>>,
    /// Most-touched entity types over the last seven days.
    pub top_entity_types_week: Vec<CountBy<EntityType>>,
}

/// Records and queries audit entries.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    store: Arc<dyn AuditStore>,
    evaluator: PermissionEvaluator,
}

impl AuditLogger {
    /// Creates a new audit logger.
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self {
            store,
            evaluator: PermissionEvaluator::new(),
        }
    }

    /// Append an entry, logging and swallowing any failure.
    pub async fn record_best_effort(
        &self,
        actor_id: UserId,
        action: AuditAction,
        entity_type: EntityType,
        entity_id: Option<Uuid>,
    ) {
        let entry = CreateAuditLogEntry {
            actor_id,
            action,
            entity_type,
            entity_id,
        };
        if let Err(e) = self.store.append(&entry).await {
            let failure =
                AppError::with_source(ErrorKind::AuditWriteFailed, "Audit write failed", e);
            warn!(
                target: "audit",
                actor_id = %actor_id,
                action = %action,
                entity_type = %entity_type,
                error = %failure,
                "Dropping audit entry"
            );
        }
    }

    /// Build the entry a store will write inside its atomic unit.
    pub fn record_transactional(
        &self,
        actor_id: UserId,
        action: AuditAction,
        entity_type: EntityType,
        entity_id: impl Into<Uuid>,
    ) -> CreateAuditLogEntry {
        CreateAuditLogEntry::new(actor_id, action, entity_type, entity_id)
    }

    /// Browse entries newest first. Requires `view_logs`.
    pub async fn search(
        &self,
        identity: &SessionIdentity,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        self.evaluator.require(identity, Capability::ViewLogs)?;
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(AppError::validation("Date range start is after its end"));
            }
        }
        self.store.search(filter, page).await
    }

    /// Today's per-action counts and the week's top entity types.
    pub async fn stats(&self, identity: &SessionIdentity) -> AppResult<AuditStats> {
        self.evaluator.require(identity, Capability::ViewLogs)?;
        let now = Utc::now();
        Ok(AuditStats {
            today_by_action: self.store.count_by_action(start_of_day(now)).await?,
            top_entity_types_week: self
                .store
                .top_entity_types(now - Duration::days(7), TOP_ENTITY_TYPES)
                .await?,
        })
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
