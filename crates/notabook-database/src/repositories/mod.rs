//! PostgreSQL implementations of the store traits.

pub mod audit;
pub mod client;
pub mod folio;
pub mod note;
pub mod session;
pub mod user;

pub use audit::AuditLogRepository;
pub use client::ClientRepository;
pub use folio::FolioSequencer;
pub use note::NoteRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use notabook_core::error::{AppError, ErrorKind};

/// Map any sqlx failure to `StorageUnavailable` with a fixed message.
pub(crate) fn storage_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::StorageUnavailable, message, e)
}

/// Name of the violated constraint, if the error is a constraint violation.
pub(crate) fn violated_constraint(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}
