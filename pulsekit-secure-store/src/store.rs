//! The secure store facade.
//!
//! Orchestrates the key manager, cipher, authenticator, and envelope codec
//! over the injected platform traits. Within one write the pipeline is
//! strict: key retrieval, then encryption, then tagging, then persistence.
//!
//! Every public entry point is fail-soft: failures anywhere in the
//! key/random/store chain come back as `false` or `None`, never as a panic
//! or error value, because callers (UI code) have no crypto-specific
//! recovery logic and must treat failures as "data unavailable". A
//! corrupted or tampered envelope is indistinguishable from an absent one.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope::Envelope;
use crate::error::{SecureResult, SecureStoreError};
use crate::key_manager::{KeyManager, MASTER_KEY_SLOT};
use crate::platform::{Accessibility, KeyValueStore, SecureEnclave};
use crate::{authenticator, cipher};

/// Encrypted at-rest storage for sensitive values, plus a raw keychain
/// passthrough for small secrets that should never touch the general
/// persistence substrate.
///
/// Construct one per application at startup and share it; the master key is
/// fetched from the secure element once and memoized for the process
/// lifetime.
pub struct SecureStore {
    kv: Arc<dyn KeyValueStore>,
    enclave: Arc<dyn SecureEnclave>,
    keys: KeyManager,
}

impl SecureStore {
    /// Creates a secure store over the injected platform facilities.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, enclave: Arc<dyn SecureEnclave>) -> Self {
        let keys = KeyManager::new(Arc::clone(&enclave));
        Self { kv, enclave, keys }
    }

    // =========================================================================
    // Secure items (encrypted via the master key)
    // =========================================================================

    /// Serializes, encrypts, tags, and persists `value` under `key`.
    ///
    /// The stored envelope is replaced wholesale: an update produces a
    /// brand-new IV and tag. Returns `false` on any failure so callers can
    /// degrade gracefully ("couldn't save").
    pub async fn set_secure_item<T>(&self, key: &str, value: &T) -> bool
    where
        T: Serialize + Sync + ?Sized,
    {
        match self.write_envelope(key, value).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, %err, "secure write failed");
                false
            }
        }
    }

    /// Reads, verifies, decrypts, and deserializes the value under `key`.
    ///
    /// Returns `None` when the key is absent — and equally when the stored
    /// envelope is malformed, fails tag verification, or does not
    /// deserialize. Callers supply their own default via `unwrap_or`;
    /// corrupted ciphertext never propagates as application data.
    pub async fn get_secure_item<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        match self.read_envelope(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, %err, "rejecting stored item");
                None
            }
        }
    }

    /// Deletes the value under `key`.
    ///
    /// Idempotent: returns `true` whether or not the key existed; `false`
    /// only on an underlying store error.
    pub async fn remove_secure_item(&self, key: &str) -> bool {
        match self.kv.remove(key).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, %err, "secure remove failed");
                false
            }
        }
    }

    /// Destroys the master key (explicit user-initiated data wipe).
    ///
    /// Every previously stored secure item becomes permanently
    /// undecryptable and will read back as absent.
    pub async fn reset_master_key(&self) -> bool {
        match self.keys.reset().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "master key reset failed");
                false
            }
        }
    }

    async fn write_envelope<T>(&self, key: &str, value: &T) -> SecureResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let payload = serde_json::to_vec(value)
            .map_err(|err| SecureStoreError::Serialization(err.to_string()))?;

        let master = self.keys.get_or_create().await?;
        let (iv, ciphertext) = cipher::encrypt(&master, &payload);
        let tag = authenticator::tag(&master, &iv, &ciphertext);
        let envelope = Envelope {
            iv,
            ciphertext,
            tag,
        };

        self.kv.set(key, envelope.encode().into_bytes()).await
    }

    async fn read_envelope<T>(&self, key: &str) -> SecureResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(None);
        };
        let raw = String::from_utf8(raw).map_err(|_| {
            SecureStoreError::MalformedEnvelope("stored bytes are not UTF-8".to_string())
        })?;
        let envelope = Envelope::decode(&raw)?;

        let master = self.keys.get_or_create().await?;
        if !authenticator::verify(&master, &envelope.iv, &envelope.ciphertext, &envelope.tag) {
            return Err(SecureStoreError::TamperDetected);
        }

        let payload = cipher::decrypt(&master, &envelope.iv, &envelope.ciphertext);
        let value = serde_json::from_slice(&payload)
            .map_err(|err| SecureStoreError::Serialization(err.to_string()))?;
        Ok(Some(value))
    }

    // =========================================================================
    // Keychain passthrough (enclave-protected, not encrypted by us)
    // =========================================================================

    /// Stores a small secret directly in the platform secure element.
    ///
    /// The enclave's own protection is the only defense on this path.
    /// Refuses the reserved master-key slot; returns `false` on failure.
    pub async fn set_keychain_item(&self, name: &str, value: &str) -> bool {
        if name == MASTER_KEY_SLOT {
            tracing::warn!(name, "refusing write to reserved keychain slot");
            return false;
        }
        match self
            .enclave
            .set(
                name,
                value.as_bytes().to_vec(),
                Accessibility::WhenUnlocked,
            )
            .await
        {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(name, %err, "keychain write failed");
                false
            }
        }
    }

    /// Reads a small secret from the platform secure element.
    ///
    /// Returns `None` when absent, on enclave failure, or for the reserved
    /// master-key slot.
    pub async fn get_keychain_item(&self, name: &str) -> Option<String> {
        if name == MASTER_KEY_SLOT {
            return None;
        }
        match self.enclave.get(name).await {
            Ok(Some(bytes)) => match String::from_utf8(bytes) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(name, "keychain item is not UTF-8");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(name, %err, "keychain read failed");
                None
            }
        }
    }

    /// Deletes a small secret from the platform secure element.
    ///
    /// Idempotent like [`Self::remove_secure_item`]; refuses the reserved
    /// master-key slot.
    pub async fn remove_keychain_item(&self, name: &str) -> bool {
        if name == MASTER_KEY_SLOT {
            tracing::warn!(name, "refusing delete of reserved keychain slot");
            return false;
        }
        match self.enclave.delete(name).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(name, %err, "keychain delete failed");
                false
            }
        }
    }
}
