//! Opaque share token generation.

use rand::RngCore;
use rand::rngs::OsRng;

/// Token entropy in bytes.
const TOKEN_BYTES: usize = 32;

/// Generates unguessable tokens from the OS CSPRNG, hex encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareTokenGenerator;

impl ShareTokenGenerator {
    /// Creates a new generator.
    pub fn new() -> Self {
        Self
    }

    /// A fresh 64-character lowercase hex token.
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Cheap shape check before touching the store.
    pub fn is_well_formed(token: &str) -> bool {
        token.len() == TOKEN_BYTES * 2 && token.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape_and_uniqueness() {
        let generator = ShareTokenGenerator::new();
        let a = generator.generate();
        let b = generator.generate();
        assert_eq!(a.len(), 64);
        assert!(ShareTokenGenerator::is_well_formed(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn test_well_formed_rejects_garbage() {
        assert!(!ShareTokenGenerator::is_well_formed("abc"));
        assert!(!ShareTokenGenerator::is_well_formed(&"z".repeat(64)));
    }
}
