//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use notabook_core::types::{ClientId, UserId};
use notabook_database::filter::{AuditFilter, NoteFilter};
use notabook_entity::audit::{AuditAction, EntityType};
use notabook_entity::client::ClientInput;
use notabook_entity::note::{NewLineItem, NoteStatus};
use notabook_entity::user::UserRole;
use notabook_service::{CreateUserRequest, NoteInput, UpdateUserRequest};

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Create or update client body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientRequest {
    /// Business or person name.
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    /// Contact email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Phone number.
    #[serde(default)]
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Tax identifier.
    #[serde(default)]
    #[validate(length(max = 13, message = "RFC is at most 13 characters"))]
    pub rfc: Option<String>,
    /// Logo reference.
    #[serde(default)]
    pub logo_path: Option<String>,
}

impl From<ClientRequest> for ClientInput {
    fn from(req: ClientRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            rfc: req.rfc,
            logo_path: req.logo_path,
        }
    }
}

/// Create or update note body. Any `total` sent by the caller is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NoteRequest {
    /// Billed client.
    pub client_id: ClientId,
    /// Free-text description.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    /// Status; `pendiente` when omitted.
    #[serde(default)]
    pub status: NoteStatus,
    /// Line items in display order.
    #[validate(length(min = 1, message = "At least one line item is required"))]
    pub line_items: Vec<NewLineItem>,
}

impl From<NoteRequest> for NoteInput {
    fn from(req: NoteRequest) -> Self {
        Self {
            client_id: req.client_id,
            description: req.description,
            status: req.status,
            line_items: req.line_items,
        }
    }
}

/// Status change body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    /// Target status.
    pub status: NoteStatus,
}

/// Create user body (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserBody {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Role.
    pub role: UserRole,
    /// Active flag.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl From<CreateUserBody> for CreateUserRequest {
    fn from(body: CreateUserBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
            active: body.active,
        }
    }
}

/// Update user body (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserBody {
    /// Display name.
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Role.
    pub role: UserRole,
    /// Active flag.
    pub active: bool,
    /// New password, if changing.
    #[serde(default)]
    pub password: Option<String>,
}

impl From<UpdateUserBody> for UpdateUserRequest {
    fn from(body: UpdateUserBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            role: body.role,
            active: body.active,
            password: body.password,
        }
    }
}

fn default_true() -> bool {
    true
}

/// `GET /api/clients` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientListQuery {
    /// Matches name, email, or RFC.
    pub search: Option<String>,
}

/// `GET /api/notes` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteListQuery {
    /// Only this client's notes.
    pub client_id: Option<ClientId>,
    /// Only notes in this status.
    pub status: Option<NoteStatus>,
    /// Matches folio, description, or client name.
    pub search: Option<String>,
}

impl From<NoteListQuery> for NoteFilter {
    fn from(query: NoteListQuery) -> Self {
        Self {
            client_id: query.client_id,
            status: query.status,
            search: query.search,
        }
    }
}

/// `GET /api/admin/audit` filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    /// Only this actor.
    pub actor_id: Option<UserId>,
    /// Only this action.
    pub action: Option<AuditAction>,
    /// Only this entity type.
    pub entity_type: Option<EntityType>,
    /// Inclusive start (RFC 3339).
    pub from: Option<DateTime<Utc>>,
    /// Exclusive end (RFC 3339).
    pub to: Option<DateTime<Utc>>,
}

impl From<AuditQuery> for AuditFilter {
    fn from(query: AuditQuery) -> Self {
        Self {
            actor_id: query.actor_id,
            action: query.action,
            entity_type: query.entity_type,
            from: query.from,
            to: query.to,
        }
    }
}
