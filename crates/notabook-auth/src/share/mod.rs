//! Public share tokens.

pub mod token;

pub use token::ShareTokenGenerator;
