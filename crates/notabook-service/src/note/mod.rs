//! Note (invoice) transactions and reads.

pub mod service;
mod validation;

pub use service::{NoteInput, NoteTransactionManager};
