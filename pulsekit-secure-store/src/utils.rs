//! Hashing and secure-token helpers shared across PulseKit features.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Default token size in bytes; yields 64 hex characters.
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Computes the SHA-256 digest of `input` as lowercase hex.
///
/// Deterministic one-way fingerprint for equality checks — safe to log or
/// compare, not a confidentiality mechanism.
#[must_use]
pub fn hash_data(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

/// Recomputes the digest of `input` and compares it against `digest`.
///
/// Malformed digest strings (wrong length, non-hex) simply compare unequal;
/// uppercase hex is accepted. Never panics on caller-provided input.
#[must_use]
pub fn verify_hash(input: &[u8], digest: &str) -> bool {
    hash_data(input).eq_ignore_ascii_case(digest)
}

/// Generates a [`DEFAULT_TOKEN_BYTES`]-byte token as 64 hex characters.
#[must_use]
pub fn generate_secure_token() -> String {
    generate_secure_token_sized(DEFAULT_TOKEN_BYTES)
}

/// Generates `byte_length` cryptographically random bytes, rendered as
/// `2 * byte_length` hex characters.
///
/// Tokens are unguessable identifiers, drawn from the same OS CSPRNG as the
/// cipher's IVs but never correlated with them.
#[must_use]
pub fn generate_secure_token_sized(byte_length: usize) -> String {
    let mut bytes = vec![0u8; byte_length];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = hash_data(b"heart rate 72");
        let b = hash_data(b"heart rate 72");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_known_vector() {
        // SHA-256 of the empty string
        assert_eq!(
            hash_data(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_different_input_different_hash() {
        assert_ne!(hash_data(b"a"), hash_data(b"b"));
        assert_ne!(hash_data(b""), hash_data(b" "));
    }

    #[test]
    fn test_verify_hash() {
        let digest = hash_data(b"medication list");
        assert!(verify_hash(b"medication list", &digest));
        assert!(verify_hash(b"medication list", &digest.to_uppercase()));
        assert!(!verify_hash(b"different input", &digest));
        assert!(!verify_hash(b"medication list", "not-a-digest"));
        assert!(!verify_hash(b"medication list", ""));
    }

    #[test]
    fn test_token_shape() {
        for byte_length in [1, 16, 32, 64] {
            let token = generate_secure_token_sized(byte_length);
            assert_eq!(token.len(), 2 * byte_length);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
        assert_eq!(generate_secure_token().len(), 64);
        assert!(generate_secure_token_sized(0).is_empty());
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            assert!(seen.insert(generate_secure_token()));
        }
    }
}
