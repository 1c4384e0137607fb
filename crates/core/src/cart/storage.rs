//! The persistence boundary for the cart store.
//!
//! Mirrors the synchronous key-value slot the cart persists to on the
//! client: read returns the raw payload (or nothing), write replaces it
//! wholesale. Implementations decide where the bytes live; the store
//! decides what they mean.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem-backed storage failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("storage error: {0}")]
    Other(String),
}

/// A synchronous key-value slot for persisted cart state.
///
/// Both failure modes are non-fatal to the cart: a failed or corrupt
/// read hydrates an empty cart, a failed write is logged and the
/// in-memory state stays authoritative for the session.
pub trait CartStorage: Send + Sync {
    /// Read the payload stored under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be written.
    fn write(&self, key: &str, payload: &str) -> Result<(), StorageError>;
}

/// In-memory storage, for tests and ephemeral carts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one payload.
    #[must_use]
    pub fn with_payload(key: &str, payload: &str) -> Self {
        let storage = Self::new();
        let mut slots = storage.slots.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        slots.insert(key.to_owned(), payload.to_owned());
        drop(slots);
        storage
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self
            .slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        slots.insert(key.to_owned(), payload.to_owned());
        Ok(())
    }
}
