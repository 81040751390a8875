use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LedgerError;

/// Synchronous string-keyed storage backend for a [`crate::ledger::Ledger`].
///
/// Mirrors the surface of a browser-style persistent store: read one key,
/// overwrite one key, remove one key, drop everything. Backends report their
/// failures (quota, I/O, codec) as [`LedgerError`]; the ledger contains them.
pub trait KeyValueStore {
    /// Read the raw text stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError>;

    /// Store `value` under `key`, overwriting any prior entry.
    fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError>;

    /// Remove the entry under `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), LedgerError>;

    /// Remove every entry in the store.
    fn clear(&mut self) -> Result<(), LedgerError>;
}

/// Volatile in-memory backend. Never fails.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), LedgerError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), LedgerError> {
        self.entries.clear();
        Ok(())
    }
}

/// Durable backend that keeps the whole entry map in one JSON document.
///
/// The document is read once on open (an absent file is an empty store) and
/// rewritten after every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading the existing document if present.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let entries = if path.exists() {
            let bytes = fs::read(&path)?;
            serde_json::from_slice(&bytes)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, LedgerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), LedgerError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), LedgerError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), LedgerError> {
        self.entries.clear();
        self.persist()
    }
}
