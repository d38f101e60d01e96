//! Result alias and small conversion helpers.

use crate::error::AppError;

/// A specialized `Result` type for Notabook operations.
pub type AppResult<T> = Result<T, AppError>;

/// Turns a missing row into a `NotFound` error.
pub trait OptionExt<T> {
    /// Returns the value, or `NotFound` naming the missing entity.
    fn or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(format!("{entity} not found")))
    }
}
