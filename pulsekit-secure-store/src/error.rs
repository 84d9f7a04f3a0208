//! Error types for the secure store components.

use thiserror::Error;

/// Result type for secure-store operations.
pub type SecureResult<T> = Result<T, SecureStoreError>;

/// Errors raised by the encrypted storage pipeline.
///
/// Public entry points on [`crate::SecureStore`] translate these into
/// fail-soft `bool`/`Option` returns; the enum keeps every failure path
/// statically visible inside the crate.
#[derive(Debug, Error)]
pub enum SecureStoreError {
    /// The platform secure element refused the master-key read or write.
    ///
    /// Fatal for all secure operations until the platform resolves it;
    /// callers must never fall back to a default key.
    #[error("master key unavailable: {0}")]
    KeyUnavailable(String),

    /// Malformed key material or invalid cipher parameters.
    #[error("cipher error: {0}")]
    Cipher(String),

    /// Corrupt or foreign data found where an envelope was expected.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The envelope's integrity tag does not match its contents.
    #[error("integrity tag mismatch")]
    TamperDetected,

    /// Value serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Errors coming from the generic key-value store.
    #[error("key-value store error: {0}")]
    Store(String),

    /// Errors coming from the platform secure element.
    #[error("secure element error: {0}")]
    Enclave(String),
}
