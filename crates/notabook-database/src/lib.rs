//! # notabook-database
//!
//! Persistence for Notabook: the store traits the services program
//! against, PostgreSQL repositories implementing them with `sqlx`, and an
//! in-memory backend used for tests and local demos. [`Stores`] selects the
//! backend from configuration.

pub mod connection;
pub mod filter;
pub mod memory;
pub mod migration;
pub mod provider;
pub mod repositories;
pub mod traits;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use provider::Stores;
pub use traits::{AuditStore, ClientStore, NoteStore, SessionStore, UserStore};
