use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key under which every knowledge map is stored, as one JSON array of documents.
pub const KNOWLEDGE_MAPS_KEY: &str = "knowledgeMaps";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key-value store. Writes replace the whole value.
#[async_trait]
pub trait KeyValueRepository: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn delete_value(&self, key: &str) -> Result<bool, StorageError>;

    /// All stored keys in ascending order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list_keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueRepository for InMemoryRepository {
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> Result<bool, StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.remove(key).is_some())
    }

    async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.keys().cloned().collect())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let kv: Arc<dyn KeyValueRepository> = Arc::new(InMemoryRepository::new());
        Self { kv }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_overwrites_and_delete_removes() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_value(KNOWLEDGE_MAPS_KEY).await.unwrap(), None);

        repo.put_value(KNOWLEDGE_MAPS_KEY, "[]").await.unwrap();
        repo.put_value(KNOWLEDGE_MAPS_KEY, r#"["{}"]"#).await.unwrap();
        assert_eq!(
            repo.get_value(KNOWLEDGE_MAPS_KEY).await.unwrap().as_deref(),
            Some(r#"["{}"]"#)
        );

        assert!(repo.delete_value(KNOWLEDGE_MAPS_KEY).await.unwrap());
        assert!(!repo.delete_value(KNOWLEDGE_MAPS_KEY).await.unwrap());
        assert_eq!(repo.get_value(KNOWLEDGE_MAPS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn storage_clones_share_state() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.kv.put_value("b", "2").await.unwrap();
        storage.kv.put_value("a", "1").await.unwrap();
        assert_eq!(other.kv.list_keys().await.unwrap(), ["a", "b"]);
    }
}
