//! Audit trail recording and browsing.

pub mod logger;

pub use logger::{AuditLogger, AuditStats};
