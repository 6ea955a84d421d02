//! Request types submitted by a front end.

use serde::{Deserialize, Serialize};

/// Category sentinel that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Search and category selection for the post list view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    ALL_CATEGORIES.to_string()
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: default_category(),
        }
    }
}
