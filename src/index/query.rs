//! Queries against the published snapshot.
//!
//! Every method loads the current snapshot once and answers entirely
//! from it, so a rebuild landing mid-query cannot mix states: the
//! query simply finishes against the snapshot it first observed.

use crate::index::store::IndexStore;
use crate::model::{Post, SiteMode};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Reverse;
use std::sync::Arc;

/// Read-only query surface over the index store.
#[derive(Clone)]
pub struct PostService {
    store: Arc<IndexStore>,
    mode: SiteMode,
}

impl PostService {
    pub fn new(store: Arc<IndexStore>, mode: SiteMode) -> Self {
        Self { store, mode }
    }

    /// Page through posts in published order, optionally filtered by
    /// category (case-insensitive).
    ///
    /// A negative or past-end `offset` yields an empty list; a `count`
    /// of zero or less means no limit.
    pub fn get_posts(&self, offset: i64, count: i64, category: Option<&str>) -> Vec<Post> {
        if offset < 0 {
            return Vec::new();
        }
        let limit = if count <= 0 { usize::MAX } else { count as usize };

        let snapshot = self.store.current();
        snapshot
            .posts()
            .iter()
            .filter(|p| matches_category(p, category))
            .skip(offset as usize)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of posts, honoring the same optional category filter.
    pub fn post_count(&self, category: Option<&str>) -> usize {
        self.store
            .current()
            .posts()
            .iter()
            .filter(|p| matches_category(p, category))
            .count()
    }

    /// Head of the published order.
    pub fn latest_post(&self) -> Option<Post> {
        self.store.current().posts().first().cloned()
    }

    /// First post with the given slug in published order. Duplicate
    /// slugs are not deduplicated; the first match wins.
    pub fn post_by_slug(&self, slug: &str) -> Option<Post> {
        self.store
            .current()
            .posts()
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
    }

    /// Neighbors of the post with the given slug, as
    /// `(previous, next)`.
    ///
    /// "Next" is the entry just before the match in published order
    /// and "previous" the entry just after it — in blog mode "next"
    /// is the newer post. Either side is absent at the boundary; an
    /// unknown slug yields `(None, None)`.
    pub fn adjacent(&self, slug: &str) -> (Option<Post>, Option<Post>) {
        let snapshot = self.store.current();
        let posts = snapshot.posts();

        let Some(index) = posts.iter().position(|p| p.slug == slug) else {
            return (None, None);
        };

        let next = (index > 0).then(|| posts[index - 1].clone());
        let previous = posts.get(index + 1).cloned();
        (previous, next)
    }

    /// Distinct categories over the published posts.
    ///
    /// Blog mode ranks by descending frequency, ties kept in
    /// first-encounter order. Workshop mode reads each post's first
    /// category as its phase name, ordered by the phase that first
    /// introduced it.
    pub fn categories(&self) -> Vec<String> {
        let snapshot = self.store.current();
        match self.mode {
            SiteMode::Blog => ranked_categories(snapshot.posts()),
            SiteMode::Workshop => phase_names(snapshot.posts()),
        }
    }
}

/// Category membership, case-insensitive against the normalized
/// lower-case category list.
fn matches_category(post: &Post, category: Option<&str>) -> bool {
    category.is_none_or(|c| post.has_category(c))
}

fn ranked_categories(posts: &[Post]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();

    for post in posts {
        for category in &post.categories {
            if !counts.contains_key(category) {
                order.push(category.clone());
            }
            *counts.entry(category.clone()).or_insert(0) += 1;
        }
    }

    // Stable sort keeps encounter order for equal counts.
    order.sort_by_key(|c| Reverse(counts[c]));
    order
}

fn phase_names(posts: &[Post]) -> Vec<String> {
    // Posts are already ordered by (phase, step), so first encounter
    // is the introducing phase.
    let mut seen = FxHashSet::default();
    posts
        .iter()
        .filter_map(|p| p.categories.first())
        .filter(|name| seen.insert((*name).clone()))
        .cloned()
        .collect()
}
