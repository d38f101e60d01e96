//! Audit log repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use notabook_core::result::AppResult;
use notabook_core::types::{AuditLogId, PageRequest, PageResponse};
use notabook_entity::audit::{AuditAction, AuditLogEntry, CreateAuditLogEntry, EntityType};

use super::storage_error;
use crate::filter::{AuditFilter, CountBy};
use crate::traits::AuditStore;

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an entry on an existing connection or transaction.
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        entry: &CreateAuditLogEntry,
    ) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_log (id, actor_id, action, entity_type, entity_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(AuditLogId::new())
        .bind(entry.actor_id)
        .bind(entry.action)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(storage_error("Failed to write audit entry"))
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(storage_error("Failed to acquire connection"))?;
        Self::insert(&mut conn, entry).await
    }

    async fn search(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        let mut push = |column: &str, op: &str| {
            conditions.push(format!("a.{column} {op} ${param_idx}"));
            param_idx += 1;
        };
        if filter.actor_id.is_some() {
            push("actor_id", "=");
        }
        if filter.action.is_some() {
            push("action", "=");
        }
        if filter.entity_type.is_some() {
            push("entity_type", "=");
        }
        if filter.from.is_some() {
            push("created_at", ">=");
        }
        if filter.to.is_some() {
            push("created_at", "<");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM audit_log a {where_clause}");
        let select_sql = format!(
            "SELECT a.*, u.name AS actor_name FROM audit_log a \
             LEFT JOIN users u ON u.id = a.actor_id {where_clause} \
             ORDER BY a.created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditLogEntry>(&select_sql);

        if let Some(actor_id) = filter.actor_id {
            count_query = count_query.bind(actor_id);
            select_query = select_query.bind(actor_id);
        }
        if let Some(action) = filter.action {
            count_query = count_query.bind(action);
            select_query = select_query.bind(action);
        }
        if let Some(entity_type) = filter.entity_type {
            count_query = count_query.bind(entity_type);
            select_query = select_query.bind(entity_type);
        }
        if let Some(from) = filter.from {
            count_query = count_query.bind(from);
            select_query = select_query.bind(from);
        }
        if let Some(to) = filter.to {
            count_query = count_query.bind(to);
            select_query = select_query.bind(to);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Failed to count audit entries"))?;

        let entries = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to search audit log"))?;

        Ok(PageResponse::new(entries, page, total as u64))
    }

    async fn count_by_action(&self, since: DateTime<Utc>) -> AppResult<Vec<CountBy<AuditAction>>> {
        let rows: Vec<(AuditAction, i64)> = sqlx::query_as(
            "SELECT action, COUNT(*) FROM audit_log WHERE created_at >= $1 \
             GROUP BY action ORDER BY COUNT(*) DESC, action",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Failed to count audit actions"))?;

        Ok(rows
            .into_iter()
            .map(|(key, count)| CountBy { key, count })
            .collect())
    }

    async fn top_entity_types(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<CountBy<EntityType>>> {
        let rows: Vec<(EntityType, i64)> = sqlx::query_as(
            "SELECT entity_type, COUNT(*) FROM audit_log WHERE created_at >= $1 \
             GROUP BY entity_type ORDER BY COUNT(*) DESC, entity_type LIMIT $2",
        )
        .bind(since)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Failed to rank audited entity types"))?;

        Ok(rows
            .into_iter()
            .map(|(key, count)| CountBy { key, count })
            .collect())
    }
}
