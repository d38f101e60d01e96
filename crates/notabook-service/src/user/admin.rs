//! Admin user management: create, update, activation. All operations need
//! `admin_full`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use notabook_auth::{Capability, PasswordHasher, PasswordValidator, PermissionEvaluator};
use notabook_core::config::AuthConfig;
use notabook_core::error::AppError;
use notabook_core::result::{AppResult, OptionExt};
use notabook_core::types::{PageRequest, PageResponse, UserId};
use notabook_database::UserStore;
use notabook_entity::audit::{AuditAction, EntityType};
use notabook_entity::session::SessionIdentity;
use notabook_entity::user::{CreateUser, UpdateUser, User, UserRole};

use crate::audit::AuditLogger;
use crate::validation::{required_email, required_text};

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Login email (unique).
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Role assignment.
    pub role: UserRole,
    /// Whether the account can log in right away.
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Request to replace a user's fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// Display name.
    pub name: String,
    /// Login email (unique).
    pub email: String,
    /// Role.
    pub role: UserRole,
    /// Active flag.
    pub active: bool,
    /// New password. Left unchanged when absent or blank.
    #[serde(default)]
    pub password: Option<String>,
}

fn default_active() -> bool {
    true
}

/// Handles administrative user management operations.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    users: Arc<dyn UserStore>,
    audit: AuditLogger,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    evaluator: PermissionEvaluator,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(users: Arc<dyn UserStore>, audit: AuditLogger, auth: &AuthConfig) -> Self {
        Self {
            users,
            audit,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(auth),
            evaluator: PermissionEvaluator::new(),
        }
    }

    /// Lists users with pagination.
    pub async fn list_users(
        &self,
        identity: &SessionIdentity,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        self.evaluator.require(identity, Capability::AdminFull)?;
        self.users.list(page).await
    }

    /// Fetch one user.
    pub async fn get_user(&self, identity: &SessionIdentity, id: UserId) -> AppResult<User> {
        self.evaluator.require(identity, Capability::AdminFull)?;
        self.users.find_by_id(id).await?.or_not_found("User")
    }

    /// Creates a new user.
    pub async fn create_user(
        &self,
        identity: &SessionIdentity,
        req: &CreateUserRequest,
    ) -> AppResult<User> {
        self.evaluator.require(identity, Capability::AdminFull)?;
        let name = required_text(&req.name, "Name")?;
        let email = required_email(&req.email)?;
        self.validator.validate(&req.password)?;

        let user = self
            .users
            .create(&CreateUser {
                name,
                email,
                password_hash: self.hasher.hash_password(&req.password)?,
                role: req.role,
                active: req.active,
            })
            .await?;

        self.audit
            .record_best_effort(
                identity.user_id,
                AuditAction::Create,
                EntityType::User,
                Some(user.id.into()),
            )
            .await;
        info!(user_id = %user.id, role = %user.role, admin = %identity.user_id, "User created");
        Ok(user)
    }

    /// Replace a user's fields. An admin cannot change their own role or
    /// deactivate themselves.
    pub async fn update_user(
        &self,
        identity: &SessionIdentity,
        id: UserId,
        req: &UpdateUserRequest,
    ) -> AppResult<User> {
        self.evaluator.require(identity, Capability::AdminFull)?;
        let name = required_text(&req.name, "Name")?;
        let email = required_email(&req.email)?;
        let password = req.password.as_deref().filter(|p| !p.is_empty());
        if let Some(password) = password {
            self.validator.validate(password)?;
        }

        let current = self.users.find_by_id(id).await?.or_not_found("User")?;
        if id == identity.user_id {
            if req.role != current.role {
                return Err(AppError::validation("You cannot change your own role"));
            }
            if !req.active {
                return Err(AppError::validation("You cannot deactivate your own account"));
            }
        }

        let password_hash = password
            .map(|p| self.hasher.hash_password(p))
            .transpose()?;
        let user = self
            .users
            .update(&UpdateUser {
                id,
                name,
                email,
                role: req.role,
                active: req.active,
                password_hash,
            })
            .await?;

        self.audit
            .record_best_effort(
                identity.user_id,
                AuditAction::Update,
                EntityType::User,
                Some(id.into()),
            )
            .await;
        info!(user_id = %id, admin = %identity.user_id, "User updated");
        Ok(user)
    }

    /// Allow a user to log in again.
    pub async fn activate_user(&self, identity: &SessionIdentity, id: UserId) -> AppResult<User> {
        self.set_active(identity, id, true).await
    }

    /// Block a user from logging in. Refused for the caller's own account.
    pub async fn deactivate_user(
        &self,
        identity: &SessionIdentity,
        id: UserId,
    ) -> AppResult<User> {
        self.set_active(identity, id, false).await
    }

    async fn set_active(
        &self,
        identity: &SessionIdentity,
        id: UserId,
        active: bool,
    ) -> AppResult<User> {
        self.evaluator.require(identity, Capability::AdminFull)?;
        if !active && id == identity.user_id {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }

        let user = self.users.set_active(id, active).await?;
        let action = if active {
            AuditAction::Activate
        } else {
            AuditAction::Deactivate
        };
        self.audit
            .record_best_effort(identity.user_id, action, EntityType::User, Some(id.into()))
            .await;
        info!(user_id = %id, active, admin = %identity.user_id, "User active flag changed");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use notabook_core::error::ErrorKind;

    use super::*;
    use crate::testing::Harness;

    fn update_from(user: &User) -> UpdateUserRequest {
        UpdateUserRequest {
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            active: user.active,
            password: None,
        }
    }

    #[tokio::test]
    async fn test_create_user_requires_admin() {
        let h = Harness::new().await;
        let req = CreateUserRequest {
            name: "Nueva".to_string(),
            email: "nueva@notabook.test".to_string(),
            password: "abcdef".to_string(),
            role: UserRole::Secretary,
            active: true,
        };
        let err = h.users.create_user(&h.secretary, &req).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);

        let user = h.users.create_user(&h.admin, &req).await.unwrap();
        assert!(user.password_hash.starts_with("$argon2id$"));
        let outcome = h
            .sessions
            .authenticate("nueva@notabook.test", "abcdef")
            .await
            .unwrap();
        assert_eq!(outcome.identity.user_id, user.id);
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let h = Harness::new().await;
        let req = CreateUserRequest {
            name: "Corta".to_string(),
            email: "corta@notabook.test".to_string(),
            password: "abc".to_string(),
            role: UserRole::Secretary,
            active: true,
        };
        let err = h.users.create_user(&h.admin, &req).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_self_protection_leaves_row_unchanged() {
        let h = Harness::new().await;
        let me = h.users.get_user(&h.admin, h.admin.user_id).await.unwrap();

        let mut demote = update_from(&me);
        demote.role = UserRole::Secretary;
        let err = h
            .users
            .update_user(&h.admin, me.id, &demote)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let mut disable = update_from(&me);
        disable.active = false;
        assert!(h.users.update_user(&h.admin, me.id, &disable).await.is_err());
        assert!(h.users.deactivate_user(&h.admin, me.id).await.is_err());

        let after = h.users.get_user(&h.admin, me.id).await.unwrap();
        assert_eq!(after.role, UserRole::Admin);
        assert!(after.active);
    }

    #[tokio::test]
    async fn test_deactivation_blocks_login_until_reactivated() {
        let h = Harness::new().await;
        h.users
            .deactivate_user(&h.admin, h.secretary.user_id)
            .await
            .unwrap();
        let err = h
            .sessions
            .authenticate("secretaria@notabook.test", "secret123")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);

        h.users
            .activate_user(&h.admin, h.secretary.user_id)
            .await
            .unwrap();
        assert!(
            h.sessions
                .authenticate("secretaria@notabook.test", "secret123")
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_update_changes_password() {
        let h = Harness::new().await;
        let user = h
            .users
            .get_user(&h.admin, h.secretary.user_id)
            .await
            .unwrap();
        let mut req = update_from(&user);
        req.password = Some("nuevo-secreto".to_string());
        h.users.update_user(&h.admin, user.id, &req).await.unwrap();

        assert!(
            h.sessions
                .authenticate("secretaria@notabook.test", "secret123")
                .await
                .is_err()
        );
        assert!(
            h.sessions
                .authenticate("secretaria@notabook.test", "nuevo-secreto")
                .await
                .is_ok()
        );
    }
}
