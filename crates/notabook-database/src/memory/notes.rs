use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{ClientId, NoteId, PageRequest, PageResponse};
use notabook_entity::audit::CreateAuditLogEntry;
use notabook_entity::note::{
    Folio, LineItem, NewNote, Note, NoteChanges, NoteStatus, NoteSummary, number_items,
};

use super::{MemoryStore, State};
use crate::filter::{NoteFilter, NoteStats, contains_ci};
use crate::traits::NoteStore;

fn client_name(state: &State, note: &Note) -> String {
    state
        .clients
        .iter()
        .find(|c| c.id == note.client_id)
        .map(|c| c.name.clone())
        .unwrap_or_default()
}

fn require_client(state: &State, client_id: ClientId) -> AppResult<()> {
    state
        .clients
        .iter()
        .any(|c| c.id == client_id)
        .then_some(())
        .or_not_found("Client")
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn peek_next_folio(&self) -> AppResult<Folio> {
        let state = self.lock().await?;
        Ok(Folio::after(state.folio_counter))
    }

    async fn create(&self, note: &NewNote, audit: &CreateAuditLogEntry) -> AppResult<Note> {
        let mut state = self.lock().await?;
        require_client(&state, note.client_id)?;
        let audit_row = self.stage_audit(audit)?;

        let folio = Folio::after(state.folio_counter);
        let now = Utc::now();
        let created = Note {
            id: note.id,
            folio,
            client_id: note.client_id,
            description: note.description.clone(),
            total: note.total,
            status: note.status,
            created_by: note.created_by,
            created_at: now,
            updated_at: now,
        };

        state.folio_counter = folio.value();
        state.notes.push(created.clone());
        state
            .line_items
            .extend(number_items(note.id, note.line_items.clone()));
        state.audit_log.push(audit_row);

        debug!(note_id = %created.id, folio = %folio, "Note committed");
        Ok(created)
    }

    async fn update(&self, changes: &NoteChanges, audit: &CreateAuditLogEntry) -> AppResult<Note> {
        let mut state = self.lock().await?;
        let index = state
            .notes
            .iter()
            .position(|n| n.id == changes.id)
            .or_not_found("Note")?;
        require_client(&state, changes.client_id)?;
        let audit_row = self.stage_audit(audit)?;

        let note = &mut state.notes[index];
        note.client_id = changes.client_id;
        note.description = changes.description.clone();
        note.status = changes.status;
        note.total = changes.total;
        note.updated_at = Utc::now();
        let updated = note.clone();

        state.line_items.retain(|l| l.note_id != changes.id);
        state
            .line_items
            .extend(number_items(changes.id, changes.line_items.clone()));
        state.audit_log.push(audit_row);
        Ok(updated)
    }

    async fn set_status(
        &self,
        id: NoteId,
        status: NoteStatus,
        audit: &CreateAuditLogEntry,
    ) -> AppResult<Note> {
        let mut state = self.lock().await?;
        let index = state
            .notes
            .iter()
            .position(|n| n.id == id)
            .or_not_found("Note")?;
        let audit_row = self.stage_audit(audit)?;

        let note = &mut state.notes[index];
        note.status = status;
        note.updated_at = Utc::now();
        let updated = note.clone();
        state.audit_log.push(audit_row);
        Ok(updated)
    }

    async fn delete(&self, id: NoteId, audit: &CreateAuditLogEntry) -> AppResult<()> {
        let mut state = self.lock().await?;
        let index = state
            .notes
            .iter()
            .position(|n| n.id == id)
            .or_not_found("Note")?;
        let audit_row = self.stage_audit(audit)?;

        state.line_items.retain(|l| l.note_id != id);
        state.notes.remove(index);
        state.audit_log.push(audit_row);
        Ok(())
    }

    async fn find_by_id(&self, id: NoteId) -> AppResult<Option<Note>> {
        let state = self.lock().await?;
        Ok(state.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn line_items(&self, id: NoteId) -> AppResult<Vec<LineItem>> {
        let state = self.lock().await?;
        let mut items: Vec<LineItem> = state
            .line_items
            .iter()
            .filter(|l| l.note_id == id)
            .cloned()
            .collect();
        items.sort_by_key(|l| l.line_no);
        Ok(items)
    }

    async fn list(
        &self,
        filter: &NoteFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<NoteSummary>> {
        let state = self.lock().await?;
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut notes: Vec<NoteSummary> = state
            .notes
            .iter()
            .filter(|n| filter.client_id.is_none_or(|id| n.client_id == id))
            .filter(|n| filter.status.is_none_or(|status| n.status == status))
            .map(|n| NoteSummary::from_note(n, client_name(&state, n)))
            .filter(|s| {
                search.is_none_or(|term| {
                    contains_ci(&s.folio.to_string(), term)
                        || contains_ci(&s.description, term)
                        || contains_ci(&s.client_name, term)
                })
            })
            .collect();
        notes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.folio.cmp(&a.folio))
        });
        Ok(PageResponse::from_all(notes, page))
    }

    async fn stats(&self, since: DateTime<Utc>) -> AppResult<NoteStats> {
        let state = self.lock().await?;
        let pending_notes = state
            .notes
            .iter()
            .filter(|n| n.status == NoteStatus::Pending)
            .count() as i64;
        let paid_total_since: Decimal = state
            .notes
            .iter()
            .filter(|n| n.status == NoteStatus::Paid && n.created_at >= since)
            .map(|n| n.total)
            .sum();
        Ok(NoteStats {
            total_notes: state.notes.len() as i64,
            pending_notes,
            paid_total_since,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal_macros::dec;

    use notabook_core::error::ErrorKind;
    use notabook_core::types::UserId;
    use notabook_entity::audit::{AuditAction, EntityType};
    use notabook_entity::client::ClientInput;
    use notabook_entity::note::NewLineItem;

    use super::*;
    use crate::traits::{AuditStore, ClientStore};

    async fn seed_client(store: &MemoryStore) -> notabook_entity::client::Client {
        ClientStore::create(
            store,
            &ClientInput {
                name: "Acme".to_string(),
                email: "acme@example.com".to_string(),
                ..ClientInput::default()
            },
        )
        .await
        .unwrap()
    }

    fn new_note(client_id: ClientId) -> (NewNote, CreateAuditLogEntry) {
        let id = NoteId::new();
        let actor = UserId::new();
        let note = NewNote {
            id,
            client_id,
            description: "Chatarra".to_string(),
            status: NoteStatus::Pending,
            total: dec!(30.00),
            created_by: actor,
            line_items: vec![
                NewLineItem {
                    article: "CU".to_string(),
                    description: "Cobre".to_string(),
                    quantity: dec!(2.5),
                    unit_price: dec!(10.00),
                },
                NewLineItem {
                    article: "AL".to_string(),
                    description: "Aluminio".to_string(),
                    quantity: dec!(1.0),
                    unit_price: dec!(5.00),
                },
            ],
        };
        let audit = CreateAuditLogEntry::new(actor, AuditAction::Create, EntityType::Note, id);
        (note, audit)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_contiguous_folios() {
        let store = MemoryStore::new();
        let client = seed_client(&store).await;

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                let (note, audit) = new_note(client.id);
                tokio::spawn(async move { NoteStore::create(&store, &note, &audit).await })
            })
            .collect();

        let mut folios = BTreeSet::new();
        for handle in futures::future::join_all(handles).await {
            let note = handle.unwrap().unwrap();
            assert!(folios.insert(note.folio.value()));
        }
        assert_eq!(folios, (1..=20).collect::<BTreeSet<i64>>());
        assert_eq!(store.peek_next_folio().await.unwrap().to_string(), "000021");
    }

    #[tokio::test]
    async fn test_failed_audit_rolls_back_create() {
        let store = MemoryStore::new();
        let client = seed_client(&store).await;
        store.set_audit_unavailable(true);

        let (note, audit) = new_note(client.id);
        let err = NoteStore::create(&store, &note, &audit).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StorageUnavailable);

        store.set_audit_unavailable(false);
        assert!(NoteStore::find_by_id(&store, note.id).await.unwrap().is_none());
        assert!(store.line_items(note.id).await.unwrap().is_empty());
        assert_eq!(store.audit_len().await, 0);
        assert_eq!(store.peek_next_folio().await.unwrap(), Folio::FIRST);
    }

    #[tokio::test]
    async fn test_deleted_folio_is_not_reissued() {
        let store = MemoryStore::new();
        let client = seed_client(&store).await;
        let (first, audit) = new_note(client.id);
        let created = NoteStore::create(&store, &first, &audit).await.unwrap();

        let delete_audit =
            CreateAuditLogEntry::new(audit.actor_id, AuditAction::Delete, EntityType::Note, first.id);
        NoteStore::delete(&store, created.id, &delete_audit).await.unwrap();

        let (second, audit) = new_note(client.id);
        let again = NoteStore::create(&store, &second, &audit).await.unwrap();
        assert_eq!(again.folio.to_string(), "000002");
    }

    #[tokio::test]
    async fn test_update_replaces_line_items() {
        let store = MemoryStore::new();
        let client = seed_client(&store).await;
        let (note, audit) = new_note(client.id);
        NoteStore::create(&store, &note, &audit).await.unwrap();

        let changes = NoteChanges {
            id: note.id,
            client_id: client.id,
            description: "Solo cobre".to_string(),
            status: NoteStatus::Paid,
            total: dec!(3.00),
            line_items: vec![NewLineItem {
                article: String::new(),
                description: "Cobre".to_string(),
                quantity: dec!(1),
                unit_price: dec!(3),
            }],
        };
        let update_audit =
            CreateAuditLogEntry::new(audit.actor_id, AuditAction::Update, EntityType::Note, note.id);
        NoteStore::update(&store, &changes, &update_audit).await.unwrap();

        let items = store.line_items(note.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line_no, 1);
        assert_eq!(items[0].description, "Cobre");
    }

    #[tokio::test]
    async fn test_client_with_notes_cannot_be_deleted() {
        let store = MemoryStore::new();
        let client = seed_client(&store).await;
        let (note, audit) = new_note(client.id);
        NoteStore::create(&store, &note, &audit).await.unwrap();

        let err = ClientStore::delete(&store, client.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(ClientStore::find_by_id(&store, client.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_everything() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let err = store.peek_next_folio().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StorageUnavailable);
        let err = AuditStore::search(&store, &Default::default(), &PageRequest::default())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::StorageUnavailable));
    }
}
