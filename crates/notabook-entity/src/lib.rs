//! # notabook-entity
//!
//! Domain entity models for Notabook. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow` so that the PostgreSQL repositories can map rows
//! directly, and all of them serialize with `serde` for the HTTP layer.

pub mod audit;
pub mod client;
pub mod note;
pub mod session;
pub mod user;
