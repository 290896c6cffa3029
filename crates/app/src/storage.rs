//! Durable key-value slots.
//!
//! The client keeps exactly two pieces of local state between runs: the
//! serialized cart and the admin session token. Both live behind
//! [`KeyValueStore`] so the cart store and session logic never care whether
//! they are backed by files on disk or an in-memory map.

use std::{
    collections::HashMap,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;

/// Slot holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Slot holding the admin session token.
pub const TOKEN_KEY: &str = "token";

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters that cannot name a slot.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Reading a slot failed.
    #[error("failed to read storage slot {key}")]
    Read {
        /// Slot name
        key: String,

        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Writing a slot failed.
    #[error("failed to write storage slot {key}")]
    Write {
        /// Slot name
        key: String,

        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Removing a slot failed.
    #[error("failed to remove storage slot {key}")]
    Remove {
        /// Slot name
        key: String,

        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A previous writer panicked while holding the store lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// String slots addressed by a fixed key.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read a slot; `None` when it was never written or has been removed.
    ///
    /// # Errors
    ///
    /// Returns an error when the slot exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the contents of a slot.
    ///
    /// # Errors
    ///
    /// Returns an error when the slot cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a slot. Removing a missing slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing slot cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store slots under `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("json.tmp");

        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            fs::write(&staging, value)?;
            fs::rename(&staging, &path)
        };

        write().map_err(|source| StorageError::Write {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Remove {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Process-local slots, used by tests and embedders without a disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;

        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;

        slots.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().map_err(|_| StorageError::Poisoned)?;

        slots.remove(key);

        Ok(())
    }
}
