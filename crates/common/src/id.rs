//! ID generation and validation.

use ulid::Ulid;
use uuid::Uuid;

use crate::{AppError, AppResult};

/// Length of an identifier string.
pub const ID_LEN: usize = 26;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are lexicographically sortable and 26 characters long; they are
    /// stored lowercase.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a cryptographically secure random token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Whether `id` has the shape of an entity identifier.
///
/// Only the format is checked; the entity may still not exist.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN && Ulid::from_string(&id.to_ascii_uppercase()).is_ok()
}

/// Reject a malformed identifier with `400 Invalid <name>`.
pub fn ensure_valid_id(id: &str, name: &str) -> AppResult<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid {name}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_generated_ids_are_valid() {
        let id_gen = IdGenerator::new();
        assert!(is_valid_id(&id_gen.generate()));
    }

    #[test]
    fn test_rejects_malformed_ids() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("not-an-id"));
        assert!(!is_valid_id("507f1f77bcf86cd799439011"));
        // Right length, but 'u' is outside the Crockford alphabet.
        assert!(!is_valid_id("01arz3ndektsv4rrffq69g5fau"));
    }

    #[test]
    fn test_ensure_valid_id_message() {
        let err = ensure_valid_id("nope", "tweetId").unwrap_err();
        assert_eq!(err.message(), "Invalid tweetId");
    }

    #[test]
    fn test_generate_token() {
        let id_gen = IdGenerator::new();
        assert_eq!(id_gen.generate_token().len(), 32);
    }
}
