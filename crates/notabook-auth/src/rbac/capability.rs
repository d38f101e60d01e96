//! Enumerated capabilities gating staff operations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A capability a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// User administration.
    AdminFull,
    /// Create and edit clients and notes.
    CreateNotes,
    /// Delete clients and notes.
    DeleteRecords,
    /// Browse the audit log.
    ViewLogs,
    /// Issue public share tokens.
    GenerateQr,
}

impl Capability {
    /// Return the capability name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminFull => "admin_full",
            Self::CreateNotes => "create_notes",
            Self::DeleteRecords => "delete_records",
            Self::ViewLogs => "view_logs",
            Self::GenerateQr => "generate_qr",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
