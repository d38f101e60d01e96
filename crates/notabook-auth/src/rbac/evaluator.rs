//! Role to capability mapping.

use notabook_core::error::AppError;
use notabook_entity::session::SessionIdentity;
use notabook_entity::user::UserRole;

use super::capability::Capability;

/// Pure mapping from role to capabilities. Callers without a session have
/// no capabilities at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionEvaluator;

impl PermissionEvaluator {
    /// Creates a new evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Whether `role` holds `capability`.
    pub fn has_capability(&self, role: UserRole, capability: Capability) -> bool {
        match capability {
            Capability::CreateNotes | Capability::GenerateQr => true,
            Capability::AdminFull | Capability::DeleteRecords | Capability::ViewLogs => {
                role.is_admin()
            }
        }
    }

    /// Every capability `role` holds.
    pub fn capabilities(&self, role: UserRole) -> Vec<Capability> {
        [
            Capability::AdminFull,
            Capability::CreateNotes,
            Capability::DeleteRecords,
            Capability::ViewLogs,
            Capability::GenerateQr,
        ]
        .into_iter()
        .filter(|c| self.has_capability(role, *c))
        .collect()
    }

    /// Fail with `Unauthorized` unless the identity holds `capability`.
    pub fn require(
        &self,
        identity: &SessionIdentity,
        capability: Capability,
    ) -> Result<(), AppError> {
        if self.has_capability(identity.role, capability) {
            Ok(())
        } else {
            tracing::debug!(
                user_id = %identity.user_id,
                role = %identity.role,
                capability = %capability,
                "Capability denied"
            );
            Err(AppError::unauthorized(format!(
                "Role '{}' lacks capability '{capability}'",
                identity.role
            )))
        }
    }
}
