//! Admin-only handlers.

pub mod audit;
pub mod users;
