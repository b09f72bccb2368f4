//! Published snapshot storage with atomic replacement.
//!
//! Uses `arc-swap` for lock-free reads and atomic snapshot
//! replacement: a rebuild publishes its result with one pointer store,
//! so a reader sees either the whole old snapshot or the whole new
//! one, never a mix.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                 IndexStore (ArcSwap)                       │
//! │                                                            │
//! │  ┌────────────┐    ┌────────────┐    ┌─────────────────┐   │
//! │  │  Reader 1  │    │  Reader 2  │    │  Index Builder  │   │
//! │  └─────┬──────┘    └─────┬──────┘    └───────┬─────────┘   │
//! │        ▼                 ▼                   ▼             │
//! │    current()         current()           publish()         │
//! │   (lock-free)       (lock-free)      (atomic replace)      │
//! └────────────────────────────────────────────────────────────┘
//! ```

use crate::model::Post;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// One immutable, fully sorted collection of posts, produced by a
/// single rebuild.
#[derive(Debug, Default)]
pub struct Snapshot {
    posts: Vec<Post>,
}

impl Snapshot {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// Posts in published order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Holds the currently published snapshot.
#[derive(Debug)]
pub struct IndexStore {
    current: ArcSwap<Snapshot>,
}

impl Default for IndexStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexStore {
    /// Create a store holding an empty snapshot, so readers always
    /// have something valid to query before the first rebuild lands.
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::default()),
        }
    }

    /// Atomically replace the published snapshot.
    ///
    /// In-flight readers keep the snapshot they already loaded; it is
    /// freed when the last reference drops.
    pub fn publish(&self, snapshot: Snapshot) {
        self.current.store(Arc::new(snapshot));
    }

    /// Get the currently published snapshot. Wait-free; callers must
    /// not mutate it.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}
