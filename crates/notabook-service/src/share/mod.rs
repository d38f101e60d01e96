//! Public share links: per-client tokens and the read-only channel they open.

pub mod service;

pub use service::{IssuedShareToken, PublicNotes, ShareTokenService};
