//! Folio allocation backed by the single-row `folio_counter` table.

use sqlx::{PgConnection, PgPool};

use notabook_core::error::AppError;
use notabook_core::result::AppResult;
use notabook_entity::note::Folio;

use super::storage_error;

/// Issues folios from the counter row.
///
/// [`FolioSequencer::next`] must run inside the transaction that inserts the
/// note: the `UPDATE` holds the row lock until commit, so concurrent creators
/// queue behind it, and a rollback returns the value to the counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolioSequencer;

impl FolioSequencer {
    /// Increment the counter and return the new folio.
    pub async fn next(conn: &mut PgConnection) -> AppResult<Folio> {
        let last_value: i64 = sqlx::query_scalar(
            "UPDATE folio_counter SET last_value = last_value + 1 WHERE id = 1 RETURNING last_value",
        )
        .fetch_optional(&mut *conn)
        .await
        .map_err(storage_error("Failed to allocate folio"))?
        .ok_or_else(|| AppError::storage_unavailable("Folio counter row is missing"))?;

        Folio::from_value(last_value)
            .ok_or_else(|| AppError::internal(format!("Folio counter holds {last_value}")))
    }

    /// Read the counter without taking a lock.
    pub async fn peek(pool: &PgPool) -> AppResult<Folio> {
        let last_value: Option<i64> =
            sqlx::query_scalar("SELECT last_value FROM folio_counter WHERE id = 1")
                .fetch_optional(pool)
                .await
                .map_err(storage_error("Failed to read folio counter"))?;
        Ok(Folio::after(last_value.unwrap_or(0)))
    }
}
