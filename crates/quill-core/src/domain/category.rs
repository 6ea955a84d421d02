use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of categories offered when writing a post.
///
/// Posts keep their category as a plain string and are never checked
/// against this list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Technology,
    Lifestyle,
    Business,
    Health,
    Travel,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Technology,
        Category::Lifestyle,
        Category::Business,
        Category::Health,
        Category::Travel,
    ];

    /// Stored value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Technology => "technology",
            Category::Lifestyle => "lifestyle",
            Category::Business => "business",
            Category::Health => "health",
            Category::Travel => "travel",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Technology => "Technology",
            Category::Lifestyle => "Lifestyle",
            Category::Business => "Business",
            Category::Health => "Health",
            Category::Travel => "Travel",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown category: {wanted}"))
    }
}
