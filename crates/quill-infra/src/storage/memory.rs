//! In-memory store - the session-scoped backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{KeyValueStore, StoreError};

/// Key/value store using a HashMap behind an async RwLock.
///
/// Used for session-scoped storage and as the fallback when a durable
/// backend is unavailable. Data is lost on process exit.
pub struct InMemoryStore {
    store: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryStore::new();
        store.set("key1", "value1").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryStore::new();
        store.set("key1", "value1").await.unwrap();
        store.remove("key1").await.unwrap();
        assert_eq!(store.get("key1").await.unwrap(), None);

        // Removing again is fine
        store.remove("key1").await.unwrap();
    }
}
