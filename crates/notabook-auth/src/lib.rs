//! # notabook-auth
//!
//! Authentication and authorization primitives for Notabook.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and policy enforcement
//! - `jwt`: access token creation and validation
//! - `rbac`: the role to capability mapping
//! - `share`: unguessable public share token generation

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod share;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{Capability, PermissionEvaluator};
pub use share::ShareTokenGenerator;
