//! # notabook-api
//!
//! HTTP API layer for Notabook built on Axum.
//!
//! Provides the REST endpoints for staff and the token-scoped public
//! endpoints, request logging, CORS, extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
