//! Core content entities.
//!
//! A [`Post`] is the canonical, fully normalized form of one content
//! unit: front-matter fields decoded and validated, the markdown body
//! rendered to HTML, media references rewritten. Posts are immutable
//! once constructed and shared by reference across readers.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Front-matter key names recognized in content documents.
pub mod keys {
    pub const SLUG: &str = "slug";
    pub const TITLE: &str = "title";
    pub const AUTHOR: &str = "author";
    pub const PUB_DATE: &str = "pubDate";
    pub const LAST_MODIFIED: &str = "lastModified";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORIES: &str = "categories";
    pub const PHASE: &str = "phase";
    pub const STEP: &str = "step";
}

/// Site mode, selected in `postr.toml`.
///
/// Blog mode orders posts by publication date (newest first). Workshop
/// mode orders by explicit `(phase, step)` and drops posts that carry
/// neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteMode {
    #[default]
    Blog,
    Workshop,
}

impl SiteMode {
    /// Short name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Workshop => "workshop",
        }
    }
}

/// One published content entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// URL-safe identifier; primary key for lookup and adjacency.
    pub slug: String,

    pub title: String,
    pub author: String,
    pub description: String,

    /// Declared publication instant. The source format carries no
    /// timezone, so this is a naive datetime.
    pub publication_date: NaiveDateTime,
    pub last_modified: NaiveDateTime,

    /// Lower-cased, trimmed category names in declared order.
    /// The first entry names the phase in workshop mode.
    pub categories: Vec<String>,

    /// Rendered HTML body with media references rewritten.
    pub content: String,

    /// Workshop ordering keys; 0 means "not applicable".
    pub phase: u32,
    pub step: u32,
}

impl Post {
    /// Whether the post carries valid workshop ordering keys.
    pub const fn in_workshop(&self) -> bool {
        self.phase > 0 && self.step > 0
    }

    /// Case-insensitive category membership test. `category` may be in
    /// any case; stored categories are already lower-case.
    pub fn has_category(&self, category: &str) -> bool {
        let wanted = category.to_lowercase();
        self.categories.iter().any(|c| *c == wanted)
    }
}
