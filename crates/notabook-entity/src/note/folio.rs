//! Folio: the human-facing sequential document number of a note.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use notabook_core::AppError;

/// Minimum rendered width. Larger values keep their natural width.
const FOLIO_WIDTH: usize = 6;

/// A positive, strictly increasing document number, rendered zero-padded
/// (`000042`). Stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Folio(i64);

impl Folio {
    /// The first folio ever issued.
    pub const FIRST: Folio = Folio(1);

    /// Build a folio from a counter value. Returns `None` for values below 1.
    pub fn from_value(value: i64) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    /// The folio issued when the counter currently holds `last_value`.
    pub fn after(last_value: i64) -> Self {
        Self(last_value.max(0) + 1)
    }

    /// Numeric value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Folio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = FOLIO_WIDTH)
    }
}

impl FromStr for Folio {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::validation(format!("Invalid folio: '{s}'")));
        }
        trimmed
            .parse::<i64>()
            .ok()
            .and_then(Self::from_value)
            .ok_or_else(|| AppError::validation(format!("Invalid folio: '{s}'")))
    }
}

impl Serialize for Folio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Folio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl sqlx::Type<sqlx::Postgres> for Folio {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for Folio {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Postgres>>::encode(self.to_string(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Folio {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(raw.parse::<Folio>()?)
    }
}
