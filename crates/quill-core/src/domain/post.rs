use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::user::{User, UserId};
use crate::error::DomainError;
use crate::ports::RemotePost;

pub use quill_shared::routes::PostId;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Characters of the remote body kept in an imported post's excerpt.
const REMOTE_EXCERPT_LEN: usize = 100;

/// Tags stamped onto imported posts.
const REMOTE_TAGS: [&str; 2] = ["mock", "placeholder"];

/// Author details denormalized onto every post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub full_name: String,
    pub email: String,
}

impl Profile {
    /// Used when a post is written without an active session.
    pub fn anonymous() -> Self {
        Self {
            full_name: "Current User".to_string(),
            email: "user@gmail.com".to_string(),
        }
    }
}

/// Post entity - a blog post as stored in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub profiles: Profile,
}

impl Post {
    /// Attach server-side metadata to a validated draft.
    pub fn from_draft(
        draft: PostDraft,
        id: PostId,
        author: Option<&User>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            excerpt: draft.excerpt,
            category: draft.category,
            tags: draft.tags,
            published: draft.published,
            created_at,
            user_id: author.map(|u| u.id.clone()),
            profiles: author.map(User::profile).unwrap_or_else(Profile::anonymous),
        }
    }

    /// Map a generic remote record into the post shape.
    pub fn from_remote(remote: RemotePost, imported_at: DateTime<Utc>, author: &Profile) -> Self {
        let mut excerpt: String = remote.body.chars().take(REMOTE_EXCERPT_LEN).collect();
        excerpt.push_str("...");

        Self {
            id: remote.id,
            title: remote.title,
            content: remote.body,
            excerpt: Some(excerpt),
            category: Category::General.as_str().to_string(),
            tags: REMOTE_TAGS.iter().map(|t| t.to_string()).collect(),
            published: true,
            created_at: imported_at,
            user_id: Some(UserId::from(remote.user_id)),
            profiles: author.clone(),
        }
    }

    /// Shallow merge: only fields present in the patch are replaced.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
    }
}

/// User-submitted post fields, before metadata is stamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

fn default_category() -> String {
    Category::default().as_str().to_string()
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            excerpt: None,
            category: default_category(),
            tags: Vec::new(),
            published: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Trim the text fields and check the form rules.
    pub fn validated(self) -> Result<Self, DomainError> {
        let title = check_title(&self.title)?;
        let content = check_content(&self.content)?;

        Ok(Self {
            title,
            content,
            excerpt: normalize_excerpt(self.excerpt),
            category: self.category,
            tags: self.tags,
            published: self.published,
        })
    }
}

/// Partial update for an existing post.
///
/// `excerpt` is doubly optional: `Some(None)` clears the excerpt while
/// `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<Option<String>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        *self == PostPatch::default()
    }

    /// Apply the same rules as a draft to the fields that are present.
    pub fn validated(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: self.title.as_deref().map(check_title).transpose()?,
            content: self.content.as_deref().map(check_content).transpose()?,
            excerpt: self.excerpt.map(normalize_excerpt),
            ..self
        })
    }
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("Title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation(format!(
            "Title must be less than {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(title.to_string())
}

fn check_content(content: &str) -> Result<String, DomainError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(DomainError::validation("Content is required"));
    }
    Ok(content.to_string())
}

fn normalize_excerpt(excerpt: Option<String>) -> Option<String> {
    excerpt
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}
