//! Application state - the services every command works through.

use std::sync::Arc;

use anyhow::Context;
use quill_core::JsonStore;
use quill_core::ports::{Clock, KeyValueStore};
use quill_core::services::{AuthService, PostsService};
use quill_infra::{FileStore, HttpPostSource, InMemoryStore, TokioClock};

#[cfg(feature = "redis")]
use quill_infra::RedisStore;

use crate::config::{AppConfig, StorageKind};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostsService>,
}

impl AppState {
    /// Build the services over the configured backend and restore the session.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let backend = build_backend(config).await;
        let store = JsonStore::new(backend);
        let clock: Arc<dyn Clock> = Arc::new(TokioClock);

        let remote = HttpPostSource::new(config.remote()).context("Failed to build HTTP client")?;

        let auth = Arc::new(AuthService::new(store.clone(), clock.clone(), config.auth()));
        let posts = Arc::new(PostsService::new(
            store,
            Arc::new(remote),
            auth.clone(),
            clock,
            config.posts(),
        ));

        auth.initialize().await;
        tracing::debug!(
            storage = ?config.storage,
            scope = ?config.storage.scope(),
            "Application state initialized"
        );

        Ok(Self { auth, posts })
    }
}

async fn build_backend(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    match config.storage {
        StorageKind::Session => Arc::new(InMemoryStore::new()),
        StorageKind::Durable => open_file_store(config).await,
        StorageKind::Redis => open_redis_store(config).await,
    }
}

async fn open_file_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    match FileStore::open(&config.data_dir).await {
        Ok(store) => {
            tracing::debug!(root = %store.root().display(), "Using file storage");
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!(
                "Failed to open data directory: {}. Using in-memory fallback.",
                e
            );
            Arc::new(InMemoryStore::new())
        }
    }
}

#[cfg(feature = "redis")]
async fn open_redis_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    match RedisStore::new(config.redis.clone()).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!("Redis unavailable: {}. Using file storage.", e);
            open_file_store(config).await
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn open_redis_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    tracing::warn!("Built without redis feature - using file storage");
    open_file_store(config).await
}
