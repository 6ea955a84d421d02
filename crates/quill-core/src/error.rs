//! Domain-level error types.

use thiserror::Error;

use crate::ports::{RemoteError, StoreError};

/// Domain errors - the failure taxonomy surfaced by every action.
///
/// Messages are user-facing: they end up verbatim in `ActionResult::error`.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or malformed required input.
    #[error("{0}")]
    Validation(String),

    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },

    /// Storage read/write failure, including malformed stored JSON.
    #[error("Storage error: {0}")]
    Persistence(String),

    /// Initial-load network or HTTP failure.
    #[error("Failed to fetch posts: {0}")]
    RemoteFetch(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn post_not_found(id: i64) -> Self {
        Self::NotFound {
            entity_type: "Post",
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::Persistence(err.to_string())
    }
}

impl From<RemoteError> for DomainError {
    fn from(err: RemoteError) -> Self {
        DomainError::RemoteFetch(err.to_string())
    }
}
