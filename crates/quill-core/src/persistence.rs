//! JSON persistence adapter over a pluggable key/value backend.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ports::{KeyValueStore, StoreError};

/// Key holding the active session (`User`).
pub const USER_KEY: &str = "blog_app_user";

/// Key holding the ordered post collection.
pub const POSTS_KEY: &str = "blog_app_posts";

/// Typed JSON access to a `KeyValueStore`.
///
/// Reads degrade to `None` on any failure (the failure is logged). Writes
/// log and return their error so the caller can decide whether it matters.
#[derive(Clone)]
pub struct JsonStore {
    backend: Arc<dyn KeyValueStore>,
}

impl JsonStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load and decode `key`, or `None` if it is missing or unreadable.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_load(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Failed to load stored value");
                None
            }
        }
    }

    /// Like `load`, but reports backend and decoding failures.
    pub async fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("{key}: {e}")))
    }

    /// Encode and store `value`; `None` removes the key.
    pub async fn save<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: Option<&T>,
    ) -> Result<(), StoreError> {
        let result = match value {
            None => self.backend.remove(key).await,
            Some(value) => match serde_json::to_string(value) {
                Ok(json) => self.backend.set(key, &json).await,
                Err(e) => Err(StoreError::Serialization(e.to_string())),
            },
        };

        if let Err(e) = &result {
            tracing::error!(key = %key, error = %e, "Failed to save value");
        }
        result
    }

    pub async fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.save::<()>(key, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryBackend;
    use serde_json::json;

    fn store() -> (Arc<MemoryBackend>, JsonStore) {
        let backend = Arc::new(MemoryBackend::default());
        (backend.clone(), JsonStore::new(backend))
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let (_, store) = store();
        let value = json!({"a": [1, 2, {"b": null}], "c": "text", "d": 1.5});

        store.save("k", Some(&value)).await.unwrap();
        let loaded: Option<serde_json::Value> = store.load("k").await;
        assert_eq!(loaded, Some(value));
    }

    #[tokio::test]
    async fn test_save_none_removes_key() {
        let (backend, store) = store();
        store.save("k", Some(&vec![1, 2, 3])).await.unwrap();
        store.save::<Vec<i32>>("k", None).await.unwrap();

        assert_eq!(store.load::<Vec<i32>>("k").await, None);
        assert!(backend.raw("k").await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_value_loads_as_none() {
        let (backend, store) = store();
        backend.put_raw("k", "{not json").await;

        assert_eq!(store.load::<Vec<i32>>("k").await, None);
        let err = store.try_load::<Vec<i32>>("k").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let (backend, store) = store();
        backend.fail_writes(true);

        let result = store.save("k", Some(&1)).await;
        assert!(matches!(result, Err(StoreError::Operation(_))));
    }
}
