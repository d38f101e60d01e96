//! Payment status of a note.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use notabook_core::AppError;

use crate::audit::AuditAction;

/// Payment lifecycle state. Both directions are always allowed and there is
/// no terminal state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "note_status")]
pub enum NoteStatus {
    /// Awaiting payment.
    #[default]
    #[serde(rename = "pendiente")]
    #[sqlx(rename = "pendiente")]
    Pending,
    /// Paid in full.
    #[serde(rename = "pagada")]
    #[sqlx(rename = "pagada")]
    Paid,
}

impl NoteStatus {
    /// Return the stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Paid => "pagada",
        }
    }

    /// Audit action recorded when a note moves into this status.
    pub fn transition_action(&self) -> AuditAction {
        match self {
            Self::Pending => AuditAction::MarkPending,
            Self::Paid => AuditAction::MarkPaid,
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pendiente" | "pending" => Ok(Self::Pending),
            "pagada" | "paid" => Ok(Self::Paid),
            _ => Err(AppError::validation(format!(
                "Invalid note status: '{s}'. Expected one of: pendiente, pagada"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&NoteStatus::Paid).unwrap(), "\"pagada\"");
        assert_eq!("PENDIENTE".parse::<NoteStatus>().unwrap(), NoteStatus::Pending);
        assert!("cancelada".parse::<NoteStatus>().is_err());
    }

    #[test]
    fn test_transition_action() {
        assert_eq!(NoteStatus::Paid.transition_action(), AuditAction::MarkPaid);
        assert_eq!(NoteStatus::Pending.transition_action(), AuditAction::MarkPending);
    }
}
