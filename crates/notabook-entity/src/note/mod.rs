//! Note (invoice) domain entities.

pub mod folio;
pub mod line_item;
pub mod model;
pub mod money;
pub mod status;

pub use folio::Folio;
pub use line_item::{LineItem, NewLineItem, number_items};
pub use model::{NewNote, Note, NoteChanges, NoteDetail, NoteSummary};
pub use money::{MAX_TOTAL, compute_total, round_money};
pub use status::NoteStatus;
