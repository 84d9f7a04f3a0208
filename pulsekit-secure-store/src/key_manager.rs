//! Master key lifecycle: creation, retrieval, and explicit destruction.
//!
//! The master key is created lazily on the first key-requiring operation,
//! lives only in the platform secure element (and an in-process memo), and
//! is destroyed only by an explicit user-initiated wipe.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;
use tokio::sync::Mutex;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{SecureResult, SecureStoreError};
use crate::platform::{Accessibility, SecureEnclave};

/// Reserved secure-element slot holding the master key.
///
/// Application-chosen keychain names must not collide with this constant;
/// the [`crate::SecureStore`] passthrough refuses it.
pub const MASTER_KEY_SLOT: &str = "pulsekit.secure-store.master-key.v1";

/// Size of the master key in bytes (256 bits).
pub(crate) const MASTER_KEY_SIZE: usize = 32;

/// The 256-bit symmetric master key protecting all secure items.
///
/// Canonically represented as 64 lowercase hex characters when persisted
/// in the secure element. Zeroized on drop; never logged.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; MASTER_KEY_SIZE]);

impl MasterKey {
    /// Generates a fresh random key from the OS entropy source.
    pub(crate) fn generate() -> Self {
        let mut bytes = [0u8; MASTER_KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Parses the canonical hex form read back from the secure element.
    pub(crate) fn from_hex(text: &str) -> SecureResult<Self> {
        let bytes = hex::decode(text.trim()).map_err(|_| {
            SecureStoreError::Cipher("stored master key is not valid hex".to_string())
        })?;
        if bytes.len() != MASTER_KEY_SIZE {
            return Err(SecureStoreError::Cipher(format!(
                "stored master key is {} bytes, expected {MASTER_KEY_SIZE}",
                bytes.len()
            )));
        }
        let mut key = [0u8; MASTER_KEY_SIZE];
        key.copy_from_slice(&bytes);
        Ok(Self(key))
    }

    /// Returns the canonical 64-character lowercase hex form.
    pub(crate) fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns a reference to the raw key bytes.
    pub(crate) const fn as_bytes(&self) -> &[u8; MASTER_KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Obtains or creates the master key against the injected secure element.
///
/// Creation is serialized behind a mutex so concurrent first-use callers
/// observe exactly one key; once created the key is immutable and memoized
/// for the process lifetime.
pub struct KeyManager {
    enclave: Arc<dyn SecureEnclave>,
    cached: Mutex<Option<MasterKey>>,
}

impl KeyManager {
    /// Creates a key manager over the given secure element.
    #[must_use]
    pub fn new(enclave: Arc<dyn SecureEnclave>) -> Self {
        Self {
            enclave,
            cached: Mutex::new(None),
        }
    }

    /// Returns the master key, creating and persisting it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SecureStoreError::KeyUnavailable`] if the secure element
    /// refuses the read or write, or [`SecureStoreError::Cipher`] if the
    /// persisted key material is malformed. Neither case falls back to a
    /// default key.
    pub async fn get_or_create(&self) -> SecureResult<MasterKey> {
        let mut cached = self.cached.lock().await;
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }

        // Re-read under the lock: a concurrent first-use call may have
        // created and persisted the key while we waited.
        let stored = self
            .enclave
            .get(MASTER_KEY_SLOT)
            .await
            .map_err(|err| SecureStoreError::KeyUnavailable(err.to_string()))?;

        let key = match stored {
            Some(bytes) => {
                let text = String::from_utf8(bytes).map_err(|_| {
                    SecureStoreError::Cipher("stored master key is not UTF-8".to_string())
                })?;
                MasterKey::from_hex(&text)?
            }
            None => {
                let key = MasterKey::generate();
                self.enclave
                    .set(
                        MASTER_KEY_SLOT,
                        key.to_hex().into_bytes(),
                        Accessibility::WhenUnlocked,
                    )
                    .await
                    .map_err(|err| SecureStoreError::KeyUnavailable(err.to_string()))?;
                tracing::debug!("created master key");
                key
            }
        };

        *cached = Some(key.clone());
        Ok(key)
    }

    /// Destroys the master key (explicit user-initiated data wipe).
    ///
    /// Previously stored envelopes become permanently undecryptable; the
    /// next secure write creates a fresh key.
    ///
    /// # Errors
    ///
    /// Returns [`SecureStoreError::KeyUnavailable`] if the secure element
    /// refuses the delete; the in-process memo is kept in that case so the
    /// persisted and cached keys cannot diverge.
    pub async fn reset(&self) -> SecureResult<()> {
        let mut cached = self.cached.lock().await;
        self.enclave
            .delete(MASTER_KEY_SLOT)
            .await
            .map_err(|err| SecureStoreError::KeyUnavailable(err.to_string()))?;
        *cached = None;
        Ok(())
    }
}
