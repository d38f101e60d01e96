//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use notabook_core::AppError;

/// Staff roles. A role is snapshotted into a session at login and does not
/// change for that session's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrator: user management, deletions, audit log.
    Admin,
    /// Front-desk staff: clients, notes, share links.
    Secretary,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Secretary => "secretary",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "secretary" | "secretario" => Ok(Self::Secretary),
            _ => Err(AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, secretary"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("Secretario".parse::<UserRole>().unwrap(), UserRole::Secretary);
        assert!("viewer".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&UserRole::Secretary).unwrap();
        assert_eq!(json, "\"secretary\"");
    }
}
