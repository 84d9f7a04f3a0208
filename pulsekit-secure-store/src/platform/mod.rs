//! Platform abstraction traits for the secure store.
//!
//! The secure store is platform-agnostic. The two facilities it cannot
//! provide itself — durable key-value persistence and hardware-protected
//! secret storage — are injected behind traits that the app shell
//! implements on each platform:
//!
//! - [`KeyValueStore`] — the generic string-keyed persistence substrate
//!   that receives encrypted envelopes.
//! - [`SecureEnclave`] — the platform keychain/secure-element used for the
//!   master key and small raw secrets.
//!
//! # Platform Implementations
//!
//! ## iOS (Swift)
//! - `KeyValueStore`: app group `UserDefaults` or on-disk store
//! - `SecureEnclave`: Keychain Services (`kSecAttrAccessible*` policies)
//!
//! ## Android (Kotlin)
//! - `KeyValueStore`: DataStore / internal storage
//! - `SecureEnclave`: Android Keystore–backed EncryptedSharedPreferences
//!
//! All calls are async: suspension happens only at these boundaries, never
//! inside the cryptographic transforms.

use async_trait::async_trait;

use crate::error::SecureResult;

pub mod memory;

pub use memory::MemoryPlatform;

/// Accessibility policy for secrets placed in the platform secure element.
///
/// Mirrors the iOS `kSecAttrAccessible*` constants; Android implementations
/// map these onto the closest Keystore equivalents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    /// Readable only while the device is unlocked.
    WhenUnlocked,
    /// Readable any time after the first unlock since boot.
    AfterFirstUnlock,
    /// Readable only while unlocked; never migrated to another device.
    WhenUnlockedThisDeviceOnly,
}

/// Generic string-keyed persistence substrate.
///
/// The secure store writes only opaque envelope bytes through this trait;
/// plaintext never crosses it. Implementations must be safe for concurrent
/// use — concurrent writes to the same key may race (last writer wins).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store read fails.
    async fn get(&self, key: &str) -> SecureResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store write fails.
    async fn set(&self, key: &str, value: Vec<u8>) -> SecureResult<()>;

    /// Removes the value stored under `key`.
    ///
    /// Must succeed when the key is already absent (idempotent).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store delete fails.
    async fn remove(&self, key: &str) -> SecureResult<()>;
}

/// Platform keychain / secure element for small secrets.
///
/// The enclave's own protection is the only defense for values stored
/// here; the secure store adds no encryption of its own on this path.
#[async_trait]
pub trait SecureEnclave: Send + Sync {
    /// Reads the secret stored under `name`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the secure element refuses the read (e.g. the
    /// device is locked under a stricter accessibility policy).
    async fn get(&self, name: &str) -> SecureResult<Option<Vec<u8>>>;

    /// Stores `value` under `name` with the given accessibility policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the secure element refuses the write.
    async fn set(
        &self,
        name: &str,
        value: Vec<u8>,
        accessibility: Accessibility,
    ) -> SecureResult<()>;

    /// Deletes the secret stored under `name`.
    ///
    /// Must succeed when the name is already absent (idempotent).
    ///
    /// # Errors
    ///
    /// Returns an error if the secure element refuses the delete.
    async fn delete(&self, name: &str) -> SecureResult<()>;
}
