//! Memory store: user-taught key/value facts.
//!
//! Keys are unique case-insensitively. Remembering an existing key replaces
//! its value but keeps the casing it was first written with. The whole store
//! is persisted as one JSON object blob through the `BlobStore` port.

use nova_types::error::RepositoryError;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Persistence port for string blobs under a fixed key.
///
/// Implemented by nova-infra. Uses RPITIT (Rust 2024 native async traits).
pub trait BlobStore: Send + Sync {
    /// Load the blob stored under `key`, or `None` if nothing was saved yet.
    fn load(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, RepositoryError>> + Send;

    /// Replace the blob stored under `key`.
    fn save(
        &self,
        key: &str,
        blob: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

/// Ordered key/value facts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: Vec<(String, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted JSON object. Non-string values are skipped.
    pub fn from_blob(blob: &str) -> Result<Self, RepositoryError> {
        let map: Map<String, Value> = serde_json::from_str(blob)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let mut store = MemoryStore::new();
        for (key, value) in map {
            match value {
                Value::String(value) => {
                    store.remember(key, value);
                }
                other => debug!(key = %key, value = %other, "skipping non-string memory entry"),
            }
        }
        Ok(store)
    }

    /// Serialize to a JSON object, preserving entry order.
    pub fn to_blob(&self) -> Result<String, RepositoryError> {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        serde_json::to_string(&map).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    /// Store a fact. Returns `true` when an existing key was overwritten.
    pub fn remember(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(idx) => {
                self.entries[idx].1 = value;
                true
            }
            None => {
                self.entries.push((key, value));
                false
            }
        }
    }

    /// Remove a fact. Returns `false` when no key matched.
    pub fn forget(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Look up a fact, returning the stored key casing alongside the value.
    pub fn recall(&self, key: &str) -> Option<(&str, &str)> {
        self.position(key)
            .map(|idx| (self.entries[idx].0.as_str(), self.entries[idx].1.as_str()))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        let needle = key.to_lowercase();
        self.entries
            .iter()
            .position(|(k, _)| k.to_lowercase() == needle)
    }
}

/// Load the memory store at startup.
///
/// Never fails: an absent blob gives an empty store, and an unreadable or
/// corrupt one is logged and also gives an empty store.
pub async fn load_memory<B: BlobStore>(store: &B, key: &str) -> MemoryStore {
    match store.load(key).await {
        Ok(Some(blob)) => match MemoryStore::from_blob(&blob) {
            Ok(memory) => {
                debug!(entries = memory.len(), "loaded memory store");
                memory
            }
            Err(e) => {
                warn!(error = %e, "stored memory is corrupt, starting empty");
                MemoryStore::new()
            }
        },
        Ok(None) => MemoryStore::new(),
        Err(e) => {
            warn!(error = %e, "failed to load memory store, starting empty");
            MemoryStore::new()
        }
    }
}
