//! The note transaction manager.
//!
//! Every write is checked against the permission evaluator, validated, and
//! then handed to the [`NoteStore`] as one atomic unit together with its
//! audit entry. Totals are always computed here; a total sent by a caller
//! has no field to arrive in.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use notabook_auth::{Capability, PermissionEvaluator};
use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{ClientId, NoteId, PageRequest, PageResponse};
use notabook_database::filter::NoteFilter;
use notabook_database::{ClientStore, NoteStore};
use notabook_entity::audit::{AuditAction, EntityType};
use notabook_entity::note::{
    Folio, NewLineItem, NewNote, Note, NoteChanges, NoteDetail, NoteStatus, NoteSummary,
};
use notabook_entity::session::SessionIdentity;

use super::validation::check_line_items;
use crate::audit::AuditLogger;
use crate::render::{DocumentRenderer, RenderedDocument};
use crate::validation::optional_text;

/// Caller-supplied note content, shared by create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteInput {
    /// Billed client.
    pub client_id: ClientId,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Status to store. New notes default to `pendiente`.
    #[serde(default)]
    pub status: NoteStatus,
    /// Line items in display order.
    pub line_items: Vec<NewLineItem>,
}

/// Creates, replaces, deletes and reads notes.
#[derive(Debug, Clone)]
pub struct NoteTransactionManager {
    notes: Arc<dyn NoteStore>,
    clients: Arc<dyn ClientStore>,
    audit: AuditLogger,
    evaluator: PermissionEvaluator,
}

impl NoteTransactionManager {
    /// Creates a new note transaction manager.
    pub fn new(
        notes: Arc<dyn NoteStore>,
        clients: Arc<dyn ClientStore>,
        audit: AuditLogger,
    ) -> Self {
        Self {
            notes,
            clients,
            audit,
            evaluator: PermissionEvaluator::new(),
        }
    }

    /// The folio the next successful create would receive.
    pub async fn peek_next_folio(&self) -> AppResult<Folio> {
        self.notes.peek_next_folio().await
    }

    /// Create a note with a freshly allocated folio.
    pub async fn create_note(
        &self,
        identity: &SessionIdentity,
        input: &NoteInput,
    ) -> AppResult<Note> {
        self.evaluator.require(identity, Capability::CreateNotes)?;
        let checked = check_line_items(&input.line_items)?;
        self.require_client(input.client_id).await?;

        let note = NewNote {
            id: NoteId::new(),
            client_id: input.client_id,
            description: normalize_description(&input.description),
            status: input.status,
            total: checked.total,
            created_by: identity.user_id,
            line_items: checked.items,
        };
        let entry = self.audit.record_transactional(
            identity.user_id,
            AuditAction::Create,
            EntityType::Note,
            note.id,
        );
        let created = self.notes.create(&note, &entry).await?;

        info!(
            note_id = %created.id,
            folio = %created.folio,
            total = %created.total,
            user_id = %identity.user_id,
            "Note created"
        );
        Ok(created)
    }

    /// Replace a note's scalar fields and its full line item set. The folio
    /// is kept.
    pub async fn update_note(
        &self,
        identity: &SessionIdentity,
        id: NoteId,
        input: &NoteInput,
    ) -> AppResult<Note> {
        self.evaluator.require(identity, Capability::CreateNotes)?;
        let checked = check_line_items(&input.line_items)?;
        self.notes.find_by_id(id).await?.or_not_found("Note")?;
        self.require_client(input.client_id).await?;

        let changes = NoteChanges {
            id,
            client_id: input.client_id,
            description: normalize_description(&input.description),
            status: input.status,
            total: checked.total,
            line_items: checked.items,
        };
        let entry = self.audit.record_transactional(
            identity.user_id,
            AuditAction::Update,
            EntityType::Note,
            id,
        );
        let updated = self.notes.update(&changes, &entry).await?;

        info!(note_id = %id, folio = %updated.folio, user_id = %identity.user_id, "Note updated");
        Ok(updated)
    }

    /// Delete a note and its line items. Admin only.
    pub async fn delete_note(&self, identity: &SessionIdentity, id: NoteId) -> AppResult<()> {
        self.evaluator.require(identity, Capability::DeleteRecords)?;
        let note = self.notes.find_by_id(id).await?.or_not_found("Note")?;

        let entry = self.audit.record_transactional(
            identity.user_id,
            AuditAction::Delete,
            EntityType::Note,
            id,
        );
        self.notes.delete(id, &entry).await?;

        info!(note_id = %id, folio = %note.folio, user_id = %identity.user_id, "Note deleted");
        Ok(())
    }

    /// Move a note between `pendiente` and `pagada`. Items and total are
    /// left untouched.
    pub async fn set_status(
        &self,
        identity: &SessionIdentity,
        id: NoteId,
        status: NoteStatus,
    ) -> AppResult<Note> {
        self.evaluator.require(identity, Capability::CreateNotes)?;

        let entry = self.audit.record_transactional(
            identity.user_id,
            status.transition_action(),
            EntityType::Note,
            id,
        );
        let updated = self.notes.set_status(id, status, &entry).await?;

        info!(note_id = %id, status = %status, user_id = %identity.user_id, "Note status changed");
        Ok(updated)
    }

    /// A note with its client and ordered line items.
    pub async fn get_note(&self, id: NoteId) -> AppResult<NoteDetail> {
        load_detail(self.notes.as_ref(), self.clients.as_ref(), id)
            .await?
            .or_not_found("Note")
    }

    /// Notes newest first.
    pub async fn list_notes(
        &self,
        filter: &NoteFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NoteSummary>> {
        self.notes.list(filter, page).await
    }

    /// Render a note for download and record `generate_pdf`.
    pub async fn render_note(
        &self,
        identity: &SessionIdentity,
        id: NoteId,
        renderer: &dyn DocumentRenderer,
    ) -> AppResult<RenderedDocument> {
        let detail = self.get_note(id).await?;
        let document = renderer.render(&detail)?;
        self.audit
            .record_best_effort(
                identity.user_id,
                AuditAction::GeneratePdf,
                EntityType::Note,
                Some(id.into()),
            )
            .await;
        Ok(document)
    }

    async fn require_client(&self, id: ClientId) -> AppResult<()> {
        self.clients.find_by_id(id).await?.or_not_found("Client")?;
        Ok(())
    }
}

/// Resolve a note, its client and its line items. `None` if either row is
/// missing.
pub(crate) async fn load_detail(
    notes: &dyn NoteStore,
    clients: &dyn ClientStore,
    id: NoteId,
) -> AppResult<Option<NoteDetail>> {
    let Some(note) = notes.find_by_id(id).await? else {
        return Ok(None);
    };
    let Some(client) = clients.find_by_id(note.client_id).await? else {
        return Ok(None);
    };
    let line_items = notes.line_items(id).await?;
    Ok(Some(NoteDetail {
        note,
        client,
        line_items,
    }))
}

fn normalize_description(description: &str) -> String {
    optional_text(Some(description)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use notabook_core::error::ErrorKind;
    use notabook_database::AuditStore;
    use notabook_database::filter::AuditFilter;

    use super::*;
    use crate::render::JsonRenderer;
    use crate::testing::{Harness, item, note_input};

    #[tokio::test]
    async fn test_acme_scenario() {
        let h = Harness::new().await;
        let input = note_input(
            h.acme.id,
            vec![item(dec!(2.5), dec!(10.00)), item(dec!(1.0), dec!(5.00))],
        );
        let note = h.notes.create_note(&h.secretary, &input).await.unwrap();

        assert_eq!(note.total, dec!(30.00));
        assert_eq!(note.folio.to_string(), "000001");
        assert_eq!(note.status, NoteStatus::Pending);
        assert_eq!(note.created_by, h.secretary.user_id);

        let entries = h
            .store
            .search(&AuditFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(entries.total_items, 1);
        assert_eq!(entries.items[0].action, AuditAction::Create);
        assert_eq!(entries.items[0].entity_type, EntityType::Note);
        assert_eq!(entries.items[0].entity_id, Some(note.id.into()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_folios() {
        let h = Harness::new().await;
        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let notes = h.notes.clone();
                let who = h.secretary.clone();
                let input = note_input(h.acme.id, vec![item(dec!(1), dec!(1))]);
                tokio::spawn(async move { notes.create_note(&who, &input).await })
            })
            .collect();

        let mut folios = Vec::new();
        for task in tasks {
            folios.push(task.await.unwrap().unwrap().folio.to_string());
        }
        folios.sort();
        assert_eq!(folios, vec!["000001", "000002"]);
    }

    #[tokio::test]
    async fn test_update_replaces_items_and_keeps_folio() {
        let h = Harness::new().await;
        let created = h
            .notes
            .create_note(
                &h.admin,
                &note_input(h.acme.id, vec![item(dec!(1), dec!(1)), item(dec!(2), dec!(2))]),
            )
            .await
            .unwrap();

        let mut replacement = note_input(h.globex.id, vec![item(dec!(3), dec!(1.333))]);
        replacement.status = NoteStatus::Paid;
        let updated = h
            .notes
            .update_note(&h.secretary, created.id, &replacement)
            .await
            .unwrap();
        assert_eq!(updated.folio, created.folio);
        assert_eq!(updated.total, dec!(4.00));

        let detail = h.notes.get_note(created.id).await.unwrap();
        assert_eq!(detail.client.id, h.globex.id);
        assert_eq!(detail.line_items.len(), 1);
        assert_eq!(detail.line_items[0].line_no, 1);
        assert_eq!(detail.note.status, NoteStatus::Paid);
    }

    #[tokio::test]
    async fn test_secretary_cannot_delete() {
        let h = Harness::new().await;
        let note = h
            .notes
            .create_note(&h.secretary, &note_input(h.acme.id, vec![item(dec!(1), dec!(1))]))
            .await
            .unwrap();
        let before = h.store.audit_len().await;

        let err = h.notes.delete_note(&h.secretary, note.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert!(h.notes.get_note(note.id).await.is_ok());
        assert_eq!(h.store.audit_len().await, before);

        h.notes.delete_note(&h.admin, note.id).await.unwrap();
        let err = h.notes.get_note(note.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_input_consumes_no_folio() {
        let h = Harness::new().await;
        let err = h
            .notes
            .create_note(&h.secretary, &note_input(h.acme.id, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = h
            .notes
            .create_note(
                &h.secretary,
                &note_input(ClientId::new(), vec![item(dec!(1), dec!(1))]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        assert_eq!(h.notes.peek_next_folio().await.unwrap(), Folio::FIRST);
        assert_eq!(h.store.audit_len().await, 0);
    }

    #[tokio::test]
    async fn test_storage_failure_rolls_back() {
        let h = Harness::new().await;
        h.store.set_audit_unavailable(true);
        let err = h
            .notes
            .create_note(&h.secretary, &note_input(h.acme.id, vec![item(dec!(1), dec!(1))]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StorageUnavailable);

        h.store.set_audit_unavailable(false);
        assert_eq!(h.notes.peek_next_folio().await.unwrap(), Folio::FIRST);
        assert_eq!(h.store.audit_len().await, 0);
    }

    #[tokio::test]
    async fn test_set_status_audits_transition() {
        let h = Harness::new().await;
        let note = h
            .notes
            .create_note(&h.secretary, &note_input(h.acme.id, vec![item(dec!(1), dec!(1))]))
            .await
            .unwrap();

        let paid = h
            .notes
            .set_status(&h.secretary, note.id, NoteStatus::Paid)
            .await
            .unwrap();
        assert_eq!(paid.status, NoteStatus::Paid);
        assert_eq!(paid.total, note.total);

        let entries = h
            .store
            .search(&AuditFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(entries.items[0].action, AuditAction::MarkPaid);
    }

    #[tokio::test]
    async fn test_render_note_records_generate_pdf() {
        let h = Harness::new().await;
        let note = h
            .notes
            .create_note(&h.secretary, &note_input(h.acme.id, vec![item(dec!(1), dec!(1))]))
            .await
            .unwrap();

        let document = h
            .notes
            .render_note(&h.secretary, note.id, &JsonRenderer::new())
            .await
            .unwrap();
        assert!(document.file_name.starts_with("nota_000001_"));
        assert_eq!(document.content_type, "application/json");

        let filter = AuditFilter {
            action: Some(AuditAction::GeneratePdf),
            ..AuditFilter::default()
        };
        let entries = h.store.search(&filter, &PageRequest::default()).await.unwrap();
        assert_eq!(entries.total_items, 1);
    }
}
