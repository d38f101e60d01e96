//! Audit action and entity type enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use notabook_core::AppError;

/// The kind of action an audit entry records. Stored as snake_case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    Logout,
    Create,
    Update,
    Delete,
    MarkPaid,
    MarkPending,
    GenerateQr,
    GeneratePdf,
    Activate,
    Deactivate,
}

impl AuditAction {
    /// Every action, in display order.
    pub const ALL: [AuditAction; 11] = [
        Self::Login,
        Self::Logout,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::MarkPaid,
        Self::MarkPending,
        Self::GenerateQr,
        Self::GeneratePdf,
        Self::Activate,
        Self::Deactivate,
    ];

    /// Return the stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::MarkPaid => "mark_paid",
            Self::MarkPending => "mark_pending",
            Self::GenerateQr => "generate_qr",
            Self::GeneratePdf => "generate_pdf",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == wanted)
            .ok_or_else(|| AppError::validation(format!("Invalid audit action: '{s}'")))
    }
}

/// The kind of entity an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Client,
    Note,
}

impl EntityType {
    /// Return the stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Client => "client",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "client" => Ok(Self::Client),
            "note" => Ok(Self::Note),
            _ => Err(AppError::validation(format!(
                "Invalid entity type: '{s}'. Expected one of: user, client, note"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trips_through_str() {
        for action in AuditAction::ALL {
            assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), action);
        }
        assert!("upload".parse::<AuditAction>().is_err());
    }

    #[test]
    fn test_serde_matches_storage() {
        let json = serde_json::to_string(&AuditAction::GenerateQr).unwrap();
        assert_eq!(json, "\"generate_qr\"");
        assert_eq!("NOTE".parse::<EntityType>().unwrap(), EntityType::Note);
    }
}
