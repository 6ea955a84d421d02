use async_trait::async_trait;

/// Key/value storage trait - abstraction over session, durable and Redis backends.
///
/// Values are opaque strings; JSON encoding happens in `JsonStore`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the raw value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Which kind of backing store a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageScope {
    /// Lives as long as the process.
    Session,
    /// Survives restarts.
    #[default]
    Durable,
}

/// Storage operation errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
