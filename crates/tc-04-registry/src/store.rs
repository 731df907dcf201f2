//! Opaque key-value persistence port for the registry.
//!
//! The persistence collaborator stores one JSON record per geohash; the core
//! requires no additional framing.

use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from the persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or lost the operation.
    #[error("Persistence backend error: {0}")]
    Backend(String),
}

/// Outbound persistence port: opaque KV with string keys and values.
pub trait TerritoryStore: Send + Sync {
    /// Write (or overwrite) a record.
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Read a record.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// All stored keys, in no particular order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store adapter, for tests and hosts without durable storage.
#[derive(Default)]
pub struct InMemoryTerritoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl InMemoryTerritoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TerritoryStore for InMemoryTerritoryStore {
    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.records.write().insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.records.read().get(key).cloned())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.records.read().keys().cloned().collect())
    }
}
