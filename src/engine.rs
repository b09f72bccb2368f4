//! Engine wiring: source + builder + store, with rebuild serialization.

use crate::config::{Backend, PostrConfig};
use crate::index::builder::build_snapshot;
use crate::index::query::PostService;
use crate::index::store::IndexStore;
use crate::log;
use crate::source::{ContentSource, SourceError, local::LocalSource, s3::S3Source};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What one reindex trigger amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// A rebuild ran and published a snapshot with this many posts.
    Completed { posts: usize },
    /// Another rebuild was in flight; this trigger was coalesced.
    AlreadyRunning,
}

/// The indexing engine: owns the content source, the published
/// snapshot, and the one-rebuild-at-a-time rule.
pub struct Engine {
    config: PostrConfig,
    source: Box<dyn ContentSource>,
    store: Arc<IndexStore>,
    rebuild_gate: Mutex<()>,
}

impl Engine {
    /// Build an engine with the backend selected in config.
    pub fn new(config: PostrConfig) -> Self {
        let source: Box<dyn ContentSource> = match config.content.backend {
            Backend::Local => Box::new(LocalSource::new(
                config.content.root.clone(),
                config.content.document.clone(),
            )),
            Backend::S3 => Box::new(S3Source::new(
                config.content.s3.clone(),
                config.content.document.clone(),
            )),
        };
        Self::with_source(config, source)
    }

    /// Build an engine over an explicit source (used by tests).
    pub fn with_source(config: PostrConfig, source: Box<dyn ContentSource>) -> Self {
        Self {
            config,
            source,
            store: Arc::new(IndexStore::new()),
            rebuild_gate: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &PostrConfig {
        &self.config
    }

    /// Query surface over the currently published snapshot.
    pub fn service(&self) -> PostService {
        PostService::new(Arc::clone(&self.store), self.config.site.mode)
    }

    /// Run one full rebuild and publish the result.
    ///
    /// Rebuilds are serialized: a call arriving while another rebuild
    /// holds the gate returns [`RebuildOutcome::AlreadyRunning`]
    /// instead of queueing. A source failure leaves the previously
    /// published snapshot live.
    pub async fn reindex(&self) -> Result<RebuildOutcome, SourceError> {
        let Ok(_gate) = self.rebuild_gate.try_lock() else {
            return Ok(RebuildOutcome::AlreadyRunning);
        };

        let snapshot = build_snapshot(self.source.as_ref(), &self.config).await?;
        let posts = snapshot.len();
        self.store.publish(snapshot);
        log!("index"; "published snapshot with {posts} posts");

        Ok(RebuildOutcome::Completed { posts })
    }
}
