//! File-backed cart persistence.
//!
//! The client-side cart persisted to a browser key-value slot; the
//! server-side equivalent is one JSON file per slot key under a
//! configured directory. Same contract: synchronous whole-payload
//! read/write, failures non-fatal to the in-memory cart.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use clothing_fit_core::cart::{CartStorage, StorageError};

/// Cart storage as one JSON file per slot key.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Create a store rooted at `dir`. The directory is created on the
    /// first write.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.slot_path(key), payload)?;
        Ok(())
    }
}
