//! Test doubles for the ports.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Notify, RwLock};

use crate::ports::{
    Clock, InstantClock, KeyValueStore, RemoteError, RemotePost, RemotePostSource, StoreError,
};
use crate::services::{AuthConfig, AuthService, PostsConfig, PostsService};
use crate::JsonStore;

/// Map-backed store whose writes can be made to fail.
#[derive(Default)]
pub struct MemoryBackend {
    values: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn raw(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    pub async fn put_raw(&self, key: &str, value: &str) {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Operation("disk full".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.put_raw(key, value).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.values.write().await.remove(key);
        Ok(())
    }
}

/// Remote source serving a fixed list, or failing.
#[derive(Default)]
pub struct StubRemote {
    posts: Vec<RemotePost>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubRemote {
    pub fn with_posts(count: i64) -> Self {
        Self {
            posts: (1..=count)
                .map(|id| RemotePost {
                    id,
                    title: format!("remote post {id}"),
                    body: format!("body of remote post {id}"),
                    user_id: 1,
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemotePostSource for StubRemote {
    async fn list_posts(&self) -> Result<Vec<RemotePost>, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RemoteError::Status(503));
        }
        Ok(self.posts.clone())
    }
}

/// Clock whose `sleep` parks until the test releases it.
#[derive(Default)]
pub struct GatedClock {
    entered: Notify,
    released: Notify,
}

impl GatedClock {
    /// Wait until a service is parked in `sleep`.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }
}

#[async_trait]
impl Clock for GatedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, _duration: std::time::Duration) {
        self.entered.notify_one();
        self.released.notified().await;
    }
}

/// Fully wired services over in-memory doubles with no latency.
pub struct Harness {
    pub backend: Arc<MemoryBackend>,
    pub remote: Arc<StubRemote>,
    pub auth: Arc<AuthService>,
    pub posts: PostsService,
}

impl Harness {
    pub fn new(remote: StubRemote) -> Self {
        Self::with_clock(remote, Arc::new(InstantClock))
    }

    pub fn with_clock(remote: StubRemote, clock: Arc<dyn Clock>) -> Self {
        let backend = Arc::new(MemoryBackend::default());
        let remote = Arc::new(remote);
        let store = JsonStore::new(backend.clone());

        let auth = Arc::new(AuthService::new(
            store.clone(),
            clock.clone(),
            AuthConfig::default(),
        ));
        let posts = PostsService::new(
            store,
            remote.clone(),
            auth.clone(),
            clock,
            PostsConfig::default(),
        );

        Self {
            backend,
            remote,
            auth,
            posts,
        }
    }
}
