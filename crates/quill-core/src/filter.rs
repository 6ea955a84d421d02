//! Search and category filtering - a pure view over the post collection.

use std::collections::BTreeSet;

use quill_shared::dto::{ALL_CATEGORIES, PostQuery};

use crate::domain::Post;

/// Case-insensitive substring match against title, content, excerpt, or any tag.
/// A blank query matches every post.
pub fn matches_search(post: &Post, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let hit = |text: &str| text.to_lowercase().contains(&needle);
    hit(&post.title)
        || hit(&post.content)
        || post.excerpt.as_deref().is_some_and(hit)
        || post.tags.iter().any(|tag| hit(tag))
}

/// Exact category match, or the `all` sentinel.
pub fn matches_category(post: &Post, category: &str) -> bool {
    category == ALL_CATEGORIES || post.category == category
}

/// Posts satisfying both the search and the category filter, in collection order.
pub fn filter_posts<'a>(posts: &'a [Post], query: &PostQuery) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|p| matches_category(p, &query.category))
        .filter(|p| matches_search(p, &query.search))
        .collect()
}

/// `all` followed by the sorted distinct categories present.
pub fn category_options(posts: &[Post]) -> Vec<String> {
    let present: BTreeSet<&str> = posts.iter().map(|p| p.category.as_str()).collect();

    std::iter::once(ALL_CATEGORIES)
        .chain(present)
        .map(str::to_string)
        .collect()
}
