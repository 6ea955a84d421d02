//! Posts state - CRUD over the post collection.
//!
//! The collection lives in memory and is mirrored to `blog_app_posts` after
//! every mutation. Mutations re-read the stored snapshot, change it, and
//! write it back inside one critical section, so two actions in the same
//! process never interleave their read-modify-write.

use std::sync::Arc;
use std::time::Duration;

use quill_shared::ActionResult;
use quill_shared::dto::PostQuery;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{Post, PostDraft, PostId, PostPatch, Profile};
use crate::error::DomainError;
use crate::filter;
use crate::persistence::{JsonStore, POSTS_KEY};
use crate::ports::{Clock, RemotePostSource};
use crate::services::AuthService;

/// Posts service configuration.
#[derive(Debug, Clone)]
pub struct PostsConfig {
    /// Simulated latency of add/update/delete.
    pub latency: Duration,
    /// How many remote records are imported on first load.
    pub remote_limit: usize,
    /// Author stamped onto imported posts.
    pub placeholder_author: Profile,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(500),
            remote_limit: 10,
            placeholder_author: Profile {
                full_name: "Guest Author".to_string(),
                email: "guest@example.com".to_string(),
            },
        }
    }
}

/// Observable posts state, shared by every caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostsState {
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct PostsService {
    store: JsonStore,
    remote: Arc<dyn RemotePostSource>,
    auth: Arc<AuthService>,
    clock: Arc<dyn Clock>,
    config: PostsConfig,
    state: RwLock<PostsState>,
    write_lock: Mutex<()>,
}

impl PostsService {
    pub fn new(
        store: JsonStore,
        remote: Arc<dyn RemotePostSource>,
        auth: Arc<AuthService>,
        clock: Arc<dyn Clock>,
        config: PostsConfig,
    ) -> Self {
        Self {
            store,
            remote,
            auth,
            clock,
            config,
            state: RwLock::new(PostsState::default()),
            write_lock: Mutex::new(()),
        }
    }

    /// Load the stored snapshot, importing from the remote source only when
    /// no snapshot has ever been written. An unreadable snapshot fails the
    /// fetch and is left in place.
    pub async fn fetch_posts(&self) -> ActionResult<Vec<Post>> {
        self.set_loading().await;
        let result = self.try_fetch_posts().await;
        self.settle(result).await
    }

    /// Stamp metadata onto `draft` and prepend it to the collection.
    pub async fn add_post(&self, draft: PostDraft) -> ActionResult<Post> {
        self.set_loading().await;
        let result = self.try_add_post(draft).await;
        self.settle(result).await
    }

    /// Shallow-merge `patch` onto the post with `id`.
    pub async fn update_post(&self, id: PostId, patch: PostPatch) -> ActionResult<Post> {
        self.set_loading().await;
        let result = self.try_update_post(id, patch).await;
        self.settle(result).await
    }

    /// Remove the post with `id`. A missing id is not an error.
    pub async fn delete_post(&self, id: PostId) -> ActionResult<()> {
        self.set_loading().await;
        let result = self.try_delete_post(id).await;
        self.settle(result).await
    }

    pub async fn get_post(&self, id: PostId) -> Option<Post> {
        self.state
            .read()
            .await
            .posts
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub async fn state(&self) -> PostsState {
        self.state.read().await.clone()
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.state.read().await.posts.clone()
    }

    /// Posts matching the search query and category selection.
    pub async fn visible_posts(&self, query: &PostQuery) -> Vec<Post> {
        let state = self.state.read().await;
        filter::filter_posts(&state.posts, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Category choices for the current collection, `all` first.
    pub async fn category_options(&self) -> Vec<String> {
        filter::category_options(&self.state.read().await.posts)
    }

    async fn try_fetch_posts(&self) -> Result<Vec<Post>, DomainError> {
        let _guard = self.write_lock.lock().await;

        if let Some(posts) = self.store.try_load::<Vec<Post>>(POSTS_KEY).await? {
            tracing::debug!(count = posts.len(), "Loaded posts from snapshot");
            self.mirror(posts.clone()).await;
            return Ok(posts);
        }

        let remote = self.remote.list_posts().await?;
        let imported_at = self.clock.now();
        let posts: Vec<Post> = remote
            .into_iter()
            .take(self.config.remote_limit)
            .map(|r| Post::from_remote(r, imported_at, &self.config.placeholder_author))
            .collect();

        self.store.save(POSTS_KEY, Some(&posts)).await?;
        tracing::info!(count = posts.len(), "Imported posts from remote source");
        self.mirror(posts.clone()).await;
        Ok(posts)
    }

    async fn try_add_post(&self, draft: PostDraft) -> Result<Post, DomainError> {
        let draft = draft.validated()?;
        self.clock.sleep(self.config.latency).await;

        let author = self.auth.current_user().await;
        let _guard = self.write_lock.lock().await;

        let mut posts = self.snapshot().await?;
        let created_at = self.clock.now();
        let id = next_post_id(created_at.timestamp_millis(), &posts);
        let post = Post::from_draft(draft, id, author.as_ref(), created_at);

        posts.insert(0, post.clone());
        self.store.save(POSTS_KEY, Some(&posts)).await?;
        tracing::info!(post_id = post.id, title = %post.title, "Post created");

        self.mirror(posts).await;
        Ok(post)
    }

    async fn try_update_post(&self, id: PostId, patch: PostPatch) -> Result<Post, DomainError> {
        let patch = patch.validated()?;
        self.clock.sleep(self.config.latency).await;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.snapshot().await?;

        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::post_not_found(id))?;
        post.apply(patch);
        let updated = post.clone();

        self.store.save(POSTS_KEY, Some(&posts)).await?;
        tracing::info!(post_id = id, "Post updated");

        self.mirror(posts).await;
        Ok(updated)
    }

    async fn try_delete_post(&self, id: PostId) -> Result<(), DomainError> {
        self.clock.sleep(self.config.latency).await;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.snapshot().await?;

        let before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == before {
            tracing::debug!(post_id = id, "Delete of unknown post ignored");
            return Ok(());
        }

        self.store.save(POSTS_KEY, Some(&posts)).await?;
        tracing::info!(post_id = id, "Post deleted");

        self.mirror(posts).await;
        Ok(())
    }

    /// Current stored collection. An unreadable snapshot is an error, never
    /// an empty list to write over.
    async fn snapshot(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self
            .store
            .try_load::<Vec<Post>>(POSTS_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn mirror(&self, posts: Vec<Post>) {
        self.state.write().await.posts = posts;
    }

    async fn set_loading(&self) {
        self.state.write().await.loading = true;
    }

    async fn settle<T>(&self, result: Result<T, DomainError>) -> ActionResult<T> {
        let mut state = self.state.write().await;
        state.loading = false;
        state.error = result.as_ref().err().map(|e| {
            tracing::warn!(error = %e, "Posts action failed");
            e.to_string()
        });
        ActionResult::from(result)
    }
}

/// Timestamp-derived id, bumped past the current maximum on collision.
/// When the maximum is `PostId::MAX`, the smallest free positive id is used.
fn next_post_id(candidate: PostId, posts: &[Post]) -> PostId {
    let taken = |id: PostId| posts.iter().any(|p| p.id == id);
    if !taken(candidate) {
        return candidate;
    }
    let max = posts.iter().map(|p| p.id).max().unwrap_or(candidate);
    max.max(candidate)
        .checked_add(1)
        .or_else(|| (1..PostId::MAX).find(|&id| !taken(id)))
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, UserId};
    use crate::testing::{GatedClock, Harness, StubRemote};

    fn draft(title: &str) -> PostDraft {
        PostDraft::new(title, "content")
    }

    #[tokio::test]
    async fn test_fetch_imports_remote_once() {
        let h = Harness::new(StubRemote::with_posts(15));

        let first = h.posts.fetch_posts().await;
        assert!(first.success);
        assert_eq!(first.data.unwrap().len(), 10);
        assert!(h.backend.raw(POSTS_KEY).await.is_some());

        let second = h.posts.fetch_posts().await;
        assert_eq!(second.data.unwrap().len(), 10);
        assert_eq!(h.remote.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_prefers_snapshot() {
        let h = Harness::new(StubRemote::with_posts(3));
        h.backend.put_raw(POSTS_KEY, "[]").await;

        let result = h.posts.fetch_posts().await;
        assert!(result.success);
        assert!(result.data.unwrap().is_empty());
        assert_eq!(h.remote.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_remote_failure() {
        let h = Harness::new(StubRemote::failing());

        let result = h.posts.fetch_posts().await;
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Failed to fetch posts"));

        let state = h.posts.state().await;
        assert!(!state.loading);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_add_prepends_with_fresh_id() {
        let h = Harness::new(StubRemote::with_posts(5));
        h.posts.fetch_posts().await;
        let before = h.posts.posts().await;

        let post = h.posts.add_post(draft("New")).await.data.unwrap();

        let after = h.posts.posts().await;
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[0], post);
        assert!(before.iter().all(|p| p.id != post.id));
        assert_eq!(post.profiles, Profile::anonymous());
        assert_eq!(post.user_id, None);
    }

    #[tokio::test]
    async fn test_rapid_adds_keep_ids_unique() {
        let h = Harness::new(StubRemote::default());

        let mut ids = Vec::new();
        for i in 0..20 {
            ids.push(h.posts.add_post(draft(&format!("p{i}"))).await.data.unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn test_add_stamps_current_user() {
        let h = Harness::new(StubRemote::default());
        let user = h.auth.register("a@b.com", "secret", None).await.data.unwrap();

        let post = h.posts.add_post(draft("Mine")).await.data.unwrap();
        assert_eq!(post.user_id, Some(user.id.clone()));
        assert_eq!(post.profiles, user.profile());
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_draft() {
        let h = Harness::new(StubRemote::default());

        let result = h.posts.add_post(PostDraft::new("", "content")).await;
        assert!(!result.success);
        assert!(h.posts.posts().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_fails_when_write_fails() {
        let h = Harness::new(StubRemote::default());
        h.backend.fail_writes(true);

        let result = h.posts.add_post(draft("Lost")).await;
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Storage error"));

        let state = h.posts.state().await;
        assert!(state.posts.is_empty());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let h = Harness::new(StubRemote::default());
        let post = h
            .posts
            .add_post(draft("Old").with_tags(vec!["keep".to_string()]))
            .await
            .data
            .unwrap();

        let patch = PostPatch {
            title: Some("New".to_string()),
            category: Some(Category::Travel.as_str().to_string()),
            ..Default::default()
        };
        let updated = h.posts.update_post(post.id, patch).await.data.unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.category, "travel");
        assert_eq!(updated.tags, vec!["keep".to_string()]);
        assert_eq!(updated.created_at, post.created_at);
        assert_eq!(h.posts.get_post(post.id).await, Some(updated));
    }

    #[tokio::test]
    async fn test_empty_update_is_identity() {
        let h = Harness::new(StubRemote::default());
        let post = h.posts.add_post(draft("Same")).await.data.unwrap();

        let result = h.posts.update_post(post.id, PostPatch::default()).await;
        assert_eq!(result.data, Some(post.clone()));
        assert_eq!(h.posts.posts().await, vec![post]);
    }

    #[tokio::test]
    async fn test_update_missing_post() {
        let h = Harness::new(StubRemote::default());

        let result = h.posts.update_post(42, PostPatch::default()).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Post not found: 42"));
    }

    #[tokio::test]
    async fn test_delete_removes_post() {
        let h = Harness::new(StubRemote::with_posts(3));
        h.posts.fetch_posts().await;

        assert!(h.posts.delete_post(2).await.success);
        let ids: Vec<PostId> = h.posts.posts().await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let stored: Vec<Post> =
            serde_json::from_str(&h.backend.raw(POSTS_KEY).await.unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let h = Harness::new(StubRemote::with_posts(3));
        h.posts.fetch_posts().await;
        let before = h.posts.posts().await;

        let result = h.posts.delete_post(999).await;
        assert!(result.success);
        assert_eq!(h.posts.posts().await, before);
    }

    #[tokio::test]
    async fn test_mutation_refuses_corrupt_snapshot() {
        let h = Harness::new(StubRemote::default());
        h.backend.put_raw(POSTS_KEY, "not json").await;

        let result = h.posts.add_post(draft("x")).await;
        assert!(!result.success);
        assert_eq!(h.backend.raw(POSTS_KEY).await.as_deref(), Some("not json"));
    }

    #[tokio::test]
    async fn test_fetch_keeps_corrupt_snapshot() {
        let h = Harness::new(StubRemote::with_posts(3));
        let corrupt = r#"[{"id":1,"title":"mine""#;
        h.backend.put_raw(POSTS_KEY, corrupt).await;

        let result = h.posts.fetch_posts().await;
        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("Storage error"));
        assert_eq!(h.remote.calls(), 0);
        assert_eq!(h.backend.raw(POSTS_KEY).await.as_deref(), Some(corrupt));

        let state = h.posts.state().await;
        assert!(state.posts.is_empty());
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_loading_is_set_while_add_waits() {
        let clock = Arc::new(GatedClock::default());
        let h = Arc::new(Harness::with_clock(StubRemote::default(), clock.clone()));

        let task = {
            let h = h.clone();
            tokio::spawn(async move { h.posts.add_post(draft("slow")).await })
        };
        clock.entered().await;
        assert!(h.posts.state().await.loading);

        clock.release();
        assert!(task.await.unwrap().success);
        let state = h.posts.state().await;
        assert!(!state.loading);
        assert_eq!(state.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let h = Arc::new(Harness::new(StubRemote::default()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let h = h.clone();
                tokio::spawn(async move { h.posts.add_post(draft(&format!("c{i}"))).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().success);
        }

        let stored: Vec<Post> =
            serde_json::from_str(&h.backend.raw(POSTS_KEY).await.unwrap()).unwrap();
        assert_eq!(stored.len(), 8);
    }

    #[tokio::test]
    async fn test_remote_user_ids_are_kept() {
        let h = Harness::new(StubRemote::with_posts(1));
        let posts = h.posts.fetch_posts().await.data.unwrap();
        assert_eq!(posts[0].user_id, Some(UserId::from(1)));
    }

    #[test]
    fn test_next_post_id_bumps_on_collision() {
        let post = |id| {
            Post::from_draft(PostDraft::new("t", "c"), id, None, chrono::Utc::now())
        };
        let posts = vec![post(100), post(50)];
        assert_eq!(next_post_id(200, &posts), 200);
        assert_eq!(next_post_id(100, &posts), 101);
        assert_eq!(next_post_id(50, &posts), 101);
    }

    #[test]
    fn test_next_post_id_at_max_reuses_free_id() {
        let post = |id| {
            Post::from_draft(PostDraft::new("t", "c"), id, None, chrono::Utc::now())
        };
        let posts = vec![post(PostId::MAX), post(1), post(2)];
        assert_eq!(next_post_id(PostId::MAX, &posts), 3);
        assert_eq!(next_post_id(2, &posts), 3);
    }
}
