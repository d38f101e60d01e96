//! Document rendering seam.
//!
//! Producing a printable document is delegated to a [`DocumentRenderer`].
//! The services resolve the note, its client and its line items and hand
//! the result over; the renderer only turns it into bytes.

use std::fmt::Debug;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use notabook_core::result::AppResult;
use notabook_entity::note::{Folio, NoteDetail};

/// Rendered output ready to be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// Suggested download name, e.g. `nota_000042_2026-03-01.pdf`.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub content_type: String,
    /// Document body.
    pub bytes: Vec<u8>,
}

/// Turns a resolved note into a document.
pub trait DocumentRenderer: Send + Sync + Debug {
    /// Render one note.
    fn render(&self, detail: &NoteDetail) -> AppResult<RenderedDocument>;
}

/// Serializes the resolved note as pretty JSON. Used where no document
/// engine is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    /// Creates a new JSON renderer.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for JsonRenderer {
    fn render(&self, detail: &NoteDetail) -> AppResult<RenderedDocument> {
        Ok(RenderedDocument {
            file_name: document_file_name(detail.note.folio, Utc::now().date_naive(), "json"),
            content_type: "application/json".to_string(),
            bytes: serde_json::to_vec_pretty(detail)?,
        })
    }
}

/// `nota_<folio>_<YYYY-MM-DD>.<ext>`, dated on the day of rendering.
pub fn document_file_name(folio: Folio, date: NaiveDate, extension: &str) -> String {
    format!("nota_{folio}_{}.{extension}", date.format("%Y-%m-%d"))
}
