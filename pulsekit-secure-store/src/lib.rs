//! Encrypted at-rest storage for PulseKit mobile applications.
//!
//! Health data (medications, vitals, notes) is protected on-device with
//! symmetric encryption, explicit key lifecycle management, and tamper
//! detection:
//!
//! - [`KeyManager`] — obtains or creates the 256-bit master key, persisted
//!   only in the platform secure element.
//! - AES-256-CTR encryption with a fresh random IV per write, and an
//!   HMAC-SHA256 tag over `iv || ciphertext` for tamper detection.
//! - [`Envelope`] — the `iv:ciphertext:tag` hex string persisted per item.
//! - [`SecureStore`] — the facade orchestrating the above over the injected
//!   [`platform::KeyValueStore`] and [`platform::SecureEnclave`] traits,
//!   plus a raw keychain passthrough for small secrets.
//! - [`hash_data`] / [`generate_secure_token`] — one-way hashing and
//!   unguessable identifiers sharing the same OS CSPRNG.
//!
//! # Example
//!
//! ```
//! use pulsekit_secure_store::{platform::MemoryPlatform, SecureStore};
//!
//! # async fn demo() {
//! let platform = MemoryPlatform::new();
//! let store = SecureStore::new(platform.kv.clone(), platform.enclave.clone());
//!
//! assert!(store.set_secure_item("note", "took 10mg at noon").await);
//! let note: Option<String> = store.get_secure_item("note").await;
//! assert_eq!(note.as_deref(), Some("took 10mg at noon"));
//! # }
//! ```

mod authenticator;
mod cipher;
mod envelope;
mod error;
mod key_manager;
pub mod platform;
mod store;
mod utils;

pub use envelope::{Envelope, IV_SIZE, TAG_SIZE};
pub use error::{SecureResult, SecureStoreError};
pub use key_manager::{KeyManager, MasterKey, MASTER_KEY_SLOT};
pub use store::SecureStore;
pub use utils::{
    generate_secure_token, generate_secure_token_sized, hash_data, verify_hash,
    DEFAULT_TOKEN_BYTES,
};
