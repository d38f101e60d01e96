//! Note entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use notabook_core::types::{ClientId, NoteId, UserId};

use super::folio::Folio;
use super::line_item::{LineItem, NewLineItem};
use super::status::NoteStatus;
use crate::client::Client;

/// A billing document. The folio never changes once issued.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    /// Unique note identifier.
    pub id: NoteId,
    /// Sequential document number.
    pub folio: Folio,
    /// Billed client.
    pub client_id: ClientId,
    /// Free-text description.
    pub description: String,
    /// Server-computed total, rounded to cents.
    pub total: Decimal,
    /// Payment status.
    pub status: NoteStatus,
    /// The user who created the note.
    pub created_by: UserId,
    /// When the note was created.
    pub created_at: DateTime<Utc>,
    /// When the note was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A list row: a note joined with its client's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NoteSummary {
    /// Note identifier.
    pub id: NoteId,
    /// Sequential document number.
    pub folio: Folio,
    /// Billed client.
    pub client_id: ClientId,
    /// Billed client's name.
    pub client_name: String,
    /// Free-text description.
    pub description: String,
    /// Total.
    pub total: Decimal,
    /// Payment status.
    pub status: NoteStatus,
    /// When the note was created.
    pub created_at: DateTime<Utc>,
}

impl NoteSummary {
    /// Build a summary from a note and its resolved client name.
    pub fn from_note(note: &Note, client_name: impl Into<String>) -> Self {
        Self {
            id: note.id,
            folio: note.folio,
            client_id: note.client_id,
            client_name: client_name.into(),
            description: note.description.clone(),
            total: note.total,
            status: note.status,
            created_at: note.created_at,
        }
    }
}

/// A note with its ordered line items and resolved client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDetail {
    /// The note row.
    pub note: Note,
    /// Billed client.
    pub client: Client,
    /// Line items ordered by `line_no`.
    pub line_items: Vec<LineItem>,
}

/// A validated note ready to be inserted. The folio is assigned by the store
/// inside the same atomic unit.
#[derive(Debug, Clone)]
pub struct NewNote {
    /// Pre-generated identifier.
    pub id: NoteId,
    /// Billed client.
    pub client_id: ClientId,
    /// Trimmed description.
    pub description: String,
    /// Initial status chosen by the caller.
    pub status: NoteStatus,
    /// Server-computed total.
    pub total: Decimal,
    /// Creating user.
    pub created_by: UserId,
    /// Items in submission order.
    pub line_items: Vec<NewLineItem>,
}

/// A validated full replacement of a note's scalar fields and line items.
#[derive(Debug, Clone)]
pub struct NoteChanges {
    /// The note to replace.
    pub id: NoteId,
    /// Billed client.
    pub client_id: ClientId,
    /// Trimmed description.
    pub description: String,
    /// Status.
    pub status: NoteStatus,
    /// Server-computed total.
    pub total: Decimal,
    /// Replacement items in submission order.
    pub line_items: Vec<NewLineItem>,
}
