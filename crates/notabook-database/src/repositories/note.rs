//! Note repository implementation.
//!
//! Every mutation runs in one transaction together with its audit entry;
//! note creation also allocates the folio inside that transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::debug;

use notabook_core::error::AppError;
use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{NoteId, PageRequest, PageResponse};
use notabook_entity::audit::CreateAuditLogEntry;
use notabook_entity::note::{
    Folio, LineItem, NewLineItem, NewNote, Note, NoteChanges, NoteStatus, NoteSummary,
};

use super::audit::AuditLogRepository;
use super::folio::FolioSequencer;
use super::{storage_error, violated_constraint};
use crate::filter::{NoteFilter, NoteStats};
use crate::traits::NoteStore;

/// Repository for notes and their line items.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    pool: PgPool,
}

impl NoteRepository {
    /// Create a new note repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_line_items(
        conn: &mut PgConnection,
        note_id: NoteId,
        items: &[NewLineItem],
    ) -> AppResult<()> {
        for (item, line_no) in items.iter().zip(1i32..) {
            sqlx::query(
                "INSERT INTO note_line_items \
                 (note_id, line_no, article, description, quantity, unit_price) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(note_id)
            .bind(line_no)
            .bind(&item.article)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *conn)
            .await
            .map_err(storage_error("Failed to write line item"))?;
        }
        Ok(())
    }

    async fn begin(&self) -> AppResult<sqlx::Transaction<'static, sqlx::Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(storage_error("Failed to begin transaction"))
    }
}

fn map_note_write_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| match violated_constraint(&e) {
        Some("notes_client_id_fkey") => AppError::not_found("Client not found"),
        Some("notes_folio_key") => AppError::conflict("Folio already issued"),
        _ => storage_error(message)(e),
    }
}

#[async_trait]
impl NoteStore for NoteRepository {
    async fn peek_next_folio(&self) -> AppResult<Folio> {
        FolioSequencer::peek(&self.pool).await
    }

    async fn create(&self, note: &NewNote, audit: &CreateAuditLogEntry) -> AppResult<Note> {
        let mut tx = self.begin().await?;

        let folio = FolioSequencer::next(&mut tx).await?;
        let created = sqlx::query_as::<_, Note>(
            "INSERT INTO notes (id, folio, client_id, description, total, status, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(note.id)
        .bind(folio)
        .bind(note.client_id)
        .bind(&note.description)
        .bind(note.total)
        .bind(note.status)
        .bind(note.created_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_note_write_error("Failed to create note"))?;

        Self::insert_line_items(&mut tx, note.id, &note.line_items).await?;
        AuditLogRepository::insert(&mut tx, audit).await?;

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit note"))?;

        debug!(note_id = %created.id, folio = %created.folio, "Note committed");
        Ok(created)
    }

    async fn update(&self, changes: &NoteChanges, audit: &CreateAuditLogEntry) -> AppResult<Note> {
        let mut tx = self.begin().await?;

        let updated = sqlx::query_as::<_, Note>(
            "UPDATE notes SET client_id = $2, description = $3, total = $4, status = $5, \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(changes.id)
        .bind(changes.client_id)
        .bind(&changes.description)
        .bind(changes.total)
        .bind(changes.status)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_note_write_error("Failed to update note"))?
        .or_not_found("Note")?;

        sqlx::query("DELETE FROM note_line_items WHERE note_id = $1")
            .bind(changes.id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error("Failed to replace line items"))?;
        Self::insert_line_items(&mut tx, changes.id, &changes.line_items).await?;
        AuditLogRepository::insert(&mut tx, audit).await?;

        tx.commit()
            .await
            .map_err(storage_error("Failed to commit note update"))?;
        Ok(updated)
    }

    async fn set_status(
        &self,
        id: NoteId,
        status: NoteStatus,
        audit: &CreateAuditLogEntry,
    ) -> AppResult<Note> {
        let mut tx = self.begin().await?;

        let updated = sqlx::query_as::<_, Note>(
            "UPDATE notes SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error("Failed to update note status"))?
        .or_not_found("Note")?;

        AuditLogRepository::insert(&mut tx, audit).await?;
        tx.commit()
            .await
            .map_err(storage_error("Failed to commit status change"))?;
        Ok(updated)
    }

    async fn delete(&self, id: NoteId, audit: &CreateAuditLogEntry) -> AppResult<()> {
        let mut tx = self.begin().await?;

        sqlx::query("DELETE FROM note_line_items WHERE note_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error("Failed to delete line items"))?;

        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error("Failed to delete note"))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Note not found"));
        }

        AuditLogRepository::insert(&mut tx, audit).await?;
        tx.commit()
            .await
            .map_err(storage_error("Failed to commit note deletion"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: NoteId) -> AppResult<Option<Note>> {
        sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error("Failed to find note"))
    }

    async fn line_items(&self, id: NoteId) -> AppResult<Vec<LineItem>> {
        sqlx::query_as::<_, LineItem>(
            "SELECT * FROM note_line_items WHERE note_id = $1 ORDER BY line_no",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error("Failed to load line items"))
    }

    async fn list(
        &self,
        filter: &NoteFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NoteSummary>> {
        let pattern = filter.search_pattern();
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.client_id.is_some() {
            conditions.push(format!("n.client_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.status.is_some() {
            conditions.push(format!("n.status = ${param_idx}"));
            param_idx += 1;
        }
        if pattern.is_some() {
            conditions.push(format!(
                "(n.folio ILIKE ${param_idx} OR n.description ILIKE ${param_idx} \
                 OR c.name ILIKE ${param_idx})"
            ));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let from = "FROM notes n JOIN clients c ON c.id = n.client_id";
        let count_sql = format!("SELECT COUNT(*) {from} {where_clause}");
        let select_sql = format!(
            "SELECT n.id, n.folio, n.client_id, c.name AS client_name, n.description, \
                    n.total, n.status, n.created_at \
             {from} {where_clause} \
             ORDER BY n.created_at DESC, LENGTH(n.folio) DESC, n.folio DESC \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, NoteSummary>(&select_sql);
        if let Some(client_id) = filter.client_id {
            count_query = count_query.bind(client_id);
            select_query = select_query.bind(client_id);
        }
        if let Some(status) = filter.status {
            count_query = count_query.bind(status);
            select_query = select_query.bind(status);
        }
        if let Some(pattern) = &pattern {
            count_query = count_query.bind(pattern);
            select_query = select_query.bind(pattern);
        }

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error("Failed to count notes"))?;

        let notes = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error("Failed to list notes"))?;

        Ok(PageResponse::new(notes, page, total as u64))
    }

    async fn stats(&self, since: DateTime<Utc>) -> AppResult<NoteStats> {
        let (total_notes, pending_notes, paid_total_since): (i64, i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE status = 'pendiente'), \
                    COALESCE(SUM(total) FILTER (WHERE status = 'pagada' AND created_at >= $1), 0) \
             FROM notes",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error("Failed to compute note statistics"))?;

        Ok(NoteStats {
            total_notes,
            pending_notes,
            paid_total_since,
        })
    }
}
