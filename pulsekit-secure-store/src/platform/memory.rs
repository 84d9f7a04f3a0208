//! In-memory implementations of the platform traits for testing.
//!
//! These implementations are NOT secure for production use. They exist to
//! test the secure store's interaction with its injected dependencies,
//! including failure behavior via the `set_failing` toggles.

// Test-support code; lock poisoning panics are acceptable here
#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{SecureResult, SecureStoreError};

use super::{Accessibility, KeyValueStore, SecureEnclave};

// =============================================================================
// Memory Key-Value Store
// =============================================================================

/// In-memory key-value store backed by a `HashMap`.
///
/// Thread-safe; when `set_failing(true)` has been called, every operation
/// returns [`SecureStoreError::Store`] until the toggle is cleared.
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    failing: AtomicBool,
}

impl MemoryKeyValueStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns `true` if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Clears all stored entries.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    fn check(&self) -> SecureResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SecureStoreError::Store(
                "injected key-value store failure".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> SecureResult<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> SecureResult<()> {
        self.check()?;
        self.entries.write().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> SecureResult<()> {
        self.check()?;
        self.entries.write().unwrap().remove(key);
        Ok(())
    }
}

// =============================================================================
// Memory Enclave
// =============================================================================

/// In-memory secure element backed by a `HashMap`.
///
/// Records the accessibility policy of each write and counts reads so tests
/// can assert the master key is fetched at most once per session.
pub struct MemoryEnclave {
    entries: RwLock<HashMap<String, (Vec<u8>, Accessibility)>>,
    failing: AtomicBool,
    reads: AtomicU64,
}

impl MemoryEnclave {
    /// Creates a new empty enclave.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            failing: AtomicBool::new(false),
            reads: AtomicU64::new(0),
        }
    }

    /// Makes every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the number of stored secrets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns `true` if no secrets are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Returns the accessibility policy recorded for `name`, if present.
    #[must_use]
    pub fn accessibility_of(&self, name: &str) -> Option<Accessibility> {
        self.entries.read().unwrap().get(name).map(|(_, a)| *a)
    }

    /// Returns the number of `get` calls served so far.
    #[must_use]
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Clears all stored secrets.
    pub fn clear(&self) {
        self.entries.write().unwrap().clear();
    }

    fn check(&self) -> SecureResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SecureStoreError::Enclave(
                "injected secure element failure".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryEnclave {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecureEnclave for MemoryEnclave {
    async fn get(&self, name: &str) -> SecureResult<Option<Vec<u8>>> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .read()
            .unwrap()
            .get(name)
            .map(|(value, _)| value.clone()))
    }

    async fn set(
        &self,
        name: &str,
        value: Vec<u8>,
        accessibility: Accessibility,
    ) -> SecureResult<()> {
        self.check()?;
        self.entries
            .write()
            .unwrap()
            .insert(name.to_string(), (value, accessibility));
        Ok(())
    }

    async fn delete(&self, name: &str) -> SecureResult<()> {
        self.check()?;
        self.entries.write().unwrap().remove(name);
        Ok(())
    }
}

// =============================================================================
// Memory Platform Bundle
// =============================================================================

/// Combines the in-memory implementations for easy test setup.
pub struct MemoryPlatform {
    /// In-memory key-value store.
    pub kv: Arc<MemoryKeyValueStore>,
    /// In-memory secure element.
    pub enclave: Arc<MemoryEnclave>,
}

impl MemoryPlatform {
    /// Creates a new memory platform with empty components.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kv: Arc::new(MemoryKeyValueStore::new()),
            enclave: Arc::new(MemoryEnclave::new()),
        }
    }

    /// Clears all stored data (useful for test isolation).
    pub fn reset(&self) {
        self.kv.clear();
        self.enclave.clear();
    }
}

impl Default for MemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
