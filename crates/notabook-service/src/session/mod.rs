//! Login sessions.

pub mod manager;

pub use manager::{AuthSessionManager, LoginOutcome};
