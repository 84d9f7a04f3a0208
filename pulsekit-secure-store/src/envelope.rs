//! Persisted envelope format for one secure item.
//!
//! # Layout
//!
//! A single colon-separated string of hex segments:
//!
//! ```text
//! <iv-hex(32)>:<ciphertext-hex(2·len)>:<tag-hex(64)>
//! ```
//!
//! `encode` is infallible and `decode` is total: any string produced by
//! `encode` decodes losslessly, and any other string — including
//! attacker-supplied data — yields [`SecureStoreError::MalformedEnvelope`]
//! rather than a panic.

use crate::error::{SecureResult, SecureStoreError};

/// Size of the initialization vector in bytes (128-bit AES block).
pub const IV_SIZE: usize = 16;

/// Size of the HMAC-SHA256 integrity tag in bytes.
pub const TAG_SIZE: usize = 32;

/// The (IV, ciphertext, tag) bundle persisted for one secure item.
///
/// An envelope is valid only if recomputing the tag over its IV and
/// ciphertext with the current master key yields an identical value; any
/// mismatch means the envelope is corrupt or tampered and must be rejected
/// wholesale, never partially trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Per-encryption initialization vector, never reused under one key.
    pub iv: [u8; IV_SIZE],
    /// Encrypted payload; same length as the plaintext (stream cipher).
    pub ciphertext: Vec<u8>,
    /// HMAC-SHA256 tag over `iv || ciphertext`.
    pub tag: [u8; TAG_SIZE],
}

impl Envelope {
    /// Serializes the envelope into its storable string form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}",
            hex::encode(self.iv),
            hex::encode(&self.ciphertext),
            hex::encode(self.tag)
        )
    }

    /// Parses a persisted string back into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`SecureStoreError::MalformedEnvelope`] when the segment
    /// count is wrong, a segment contains non-hex characters, or the IV or
    /// tag segment decodes to the wrong length.
    pub fn decode(raw: &str) -> SecureResult<Self> {
        let segments: Vec<&str> = raw.split(':').collect();
        let &[iv_hex, ciphertext_hex, tag_hex] = segments.as_slice() else {
            return Err(SecureStoreError::MalformedEnvelope(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        let iv_bytes = hex::decode(iv_hex).map_err(|_| {
            SecureStoreError::MalformedEnvelope("IV segment is not valid hex".to_string())
        })?;
        if iv_bytes.len() != IV_SIZE {
            return Err(SecureStoreError::MalformedEnvelope(format!(
                "IV is {} bytes, expected {IV_SIZE}",
                iv_bytes.len()
            )));
        }
        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&iv_bytes);

        let ciphertext = hex::decode(ciphertext_hex).map_err(|_| {
            SecureStoreError::MalformedEnvelope("ciphertext segment is not valid hex".to_string())
        })?;

        let tag_bytes = hex::decode(tag_hex).map_err(|_| {
            SecureStoreError::MalformedEnvelope("tag segment is not valid hex".to_string())
        })?;
        if tag_bytes.len() != TAG_SIZE {
            return Err(SecureStoreError::MalformedEnvelope(format!(
                "tag is {} bytes, expected {TAG_SIZE}",
                tag_bytes.len()
            )));
        }
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&tag_bytes);

        Ok(Self {
            iv,
            ciphertext,
            tag,
        })
    }
}
