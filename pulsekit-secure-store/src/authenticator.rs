//! Keyed integrity tags for tamper detection.
//!
//! HMAC-SHA256 over `iv || ciphertext`: any single-bit change to either
//! input changes the tag with overwhelming probability. The IV is part of
//! the authenticated message so an attacker cannot swap IVs between two
//! envelopes encrypted under the same key without invalidating the tag.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::envelope::{IV_SIZE, TAG_SIZE};
use crate::key_manager::MasterKey;

type HmacSha256 = Hmac<Sha256>;

/// Computes the integrity tag over `iv || ciphertext`.
///
/// # Panics
///
/// This function will not panic — HMAC accepts keys of any length.
pub(crate) fn tag(key: &MasterKey, iv: &[u8; IV_SIZE], ciphertext: &[u8]) -> [u8; TAG_SIZE] {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(iv);
    mac.update(ciphertext);
    mac.finalize().into_bytes().into()
}

/// Verifies `expected` against a freshly recomputed tag.
///
/// The comparison covers the full tag length in constant time; a
/// mismatching byte never short-circuits, so verification cannot be used
/// as a tamper oracle.
pub(crate) fn verify(
    key: &MasterKey,
    iv: &[u8; IV_SIZE],
    ciphertext: &[u8],
    expected: &[u8; TAG_SIZE],
) -> bool {
    let computed = tag(key, iv, ciphertext);
    computed.as_slice().ct_eq(expected.as_slice()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_is_deterministic() {
        let key = MasterKey::generate();
        let iv = [7u8; IV_SIZE];
        let first = tag(&key, &iv, b"ciphertext bytes");
        let second = tag(&key, &iv, b"ciphertext bytes");
        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_accepts_valid_tag() {
        let key = MasterKey::generate();
        let iv = [3u8; IV_SIZE];
        let computed = tag(&key, &iv, b"payload");
        assert!(verify(&key, &iv, b"payload", &computed));
    }

    #[test]
    fn test_single_bit_flip_changes_tag() {
        let key = MasterKey::generate();
        let iv = [0u8; IV_SIZE];
        let mut ciphertext = vec![0x5Au8; 64];
        let original = tag(&key, &iv, &ciphertext);

        ciphertext[17] ^= 0x01;
        let flipped = tag(&key, &iv, &ciphertext);
        assert_ne!(original, flipped);
        assert!(!verify(&key, &iv, &ciphertext, &original));
    }

    #[test]
    fn test_iv_is_authenticated() {
        let key = MasterKey::generate();
        let iv = [9u8; IV_SIZE];
        let computed = tag(&key, &iv, b"payload");

        let mut swapped = iv;
        swapped[0] ^= 0xFF;
        assert!(!verify(&key, &swapped, b"payload", &computed));
    }

    #[test]
    fn test_different_key_rejects() {
        let iv = [1u8; IV_SIZE];
        let computed = tag(&MasterKey::generate(), &iv, b"payload");
        assert!(!verify(&MasterKey::generate(), &iv, b"payload", &computed));
    }
}
