//! HTTP client for the mock REST endpoint (JSONPlaceholder-compatible).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use quill_core::ports::{RemoteError, RemotePost, RemotePostSource};

pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Remote endpoint configuration.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL; posts are listed from `{base_url}/posts`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Lists posts from `GET {base_url}/posts`.
pub struct HttpPostSource {
    client: Client,
    posts_url: String,
}

impl HttpPostSource {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        Ok(Self {
            client,
            posts_url: format!("{}/posts", config.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl RemotePostSource for HttpPostSource {
    async fn list_posts(&self) -> Result<Vec<RemotePost>, RemoteError> {
        tracing::debug!(url = %self.posts_url, "Fetching remote posts");

        let response = self
            .client
            .get(&self.posts_url)
            .send()
            .await
            .map_err(|e| RemoteError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %self.posts_url, status = status.as_u16(), "Remote post listing failed");
            return Err(RemoteError::Status(status.as_u16()));
        }

        response
            .json::<Vec<RemotePost>>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}
