//! Remote post source port - the read-only mock REST collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generic post record as served by the remote list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub user_id: i64,
}

/// Source of the initial post collection.
#[async_trait]
pub trait RemotePostSource: Send + Sync {
    /// List all posts exposed by the endpoint.
    async fn list_posts(&self) -> Result<Vec<RemotePost>, RemoteError>;
}

/// Remote fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Invalid response body: {0}")]
    Decode(String),
}
