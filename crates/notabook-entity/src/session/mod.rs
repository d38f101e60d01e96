//! Session domain entities.

pub mod identity;
pub mod model;

pub use identity::SessionIdentity;
pub use model::{CreateSession, Session};
