//! # notabook-service
//!
//! Business logic service layer for Notabook. Each service orchestrates the
//! stores and the auth primitives to implement one group of use cases.
//!
//! Every operation takes the caller's [`SessionIdentity`] explicitly and
//! consults the [`PermissionEvaluator`] before touching the store. Services
//! follow constructor injection: dependencies are provided at construction
//! time.
//!
//! [`SessionIdentity`]: notabook_entity::session::SessionIdentity
//! [`PermissionEvaluator`]: notabook_auth::PermissionEvaluator

pub mod audit;
pub mod client;
pub mod dashboard;
pub mod note;
pub mod render;
pub mod session;
pub mod share;
pub mod user;
mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use audit::{AuditLogger, AuditStats};
pub use client::ClientService;
pub use dashboard::{DashboardService, DashboardStats};
pub use note::{NoteInput, NoteTransactionManager};
pub use render::{DocumentRenderer, JsonRenderer, RenderedDocument};
pub use session::{AuthSessionManager, LoginOutcome};
pub use share::{IssuedShareToken, PublicNotes, ShareTokenService};
pub use user::{AdminUserService, CreateUserRequest, UpdateUserRequest};
