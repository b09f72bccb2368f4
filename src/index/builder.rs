//! Full index rebuilds.
//!
//! One rebuild enumerates every content unit, parses and normalizes
//! each independently, and assembles the survivors into a sorted
//! [`Snapshot`]. A unit that fails to read or parse is logged and
//! skipped; only an unlistable source aborts the rebuild.

use crate::config::PostrConfig;
use crate::content::{self, UnitSkip};
use crate::index::store::Snapshot;
use crate::log;
use crate::model::{Post, SiteMode};
use crate::normalize;
use crate::source::{ContentSource, SourceError};

/// Run one full rebuild against `source`.
///
/// Zero valid units is not a failure: the result is an empty snapshot,
/// ready to publish.
pub async fn build_snapshot(
    source: &dyn ContentSource,
    config: &PostrConfig,
) -> Result<Snapshot, SourceError> {
    let units = source.list_units().await?;
    log!("index"; "scanning {} units from {}", units.len(), source.describe());

    let mut posts = Vec::with_capacity(units.len());
    for unit in &units {
        let bytes = match source.read_unit(unit).await {
            Ok(bytes) => bytes,
            Err(err) => {
                log!("index"; "skipping {}: {err}", unit.name);
                continue;
            }
        };

        match parse_unit(&String::from_utf8_lossy(&bytes), config) {
            Ok(post) => posts.push(post),
            Err(skip) => log!("index"; "skipping {}: {skip}", unit.name),
        }
    }

    Ok(Snapshot::new(finalize(posts, config.site.mode)))
}

/// Parse and normalize one unit's text.
fn parse_unit(text: &str, config: &PostrConfig) -> Result<Post, UnitSkip> {
    let (fields, html) = content::parse_document(text)?;
    normalize::normalize(&fields, &html, config)
}

/// Mode-dependent filtering and ordering.
///
/// Blog: newest first. Workshop: posts without valid phase/step are
/// dropped, the rest ordered by `(phase, step)`. Both sorts are
/// stable, so equal keys keep enumeration order.
fn finalize(mut posts: Vec<Post>, mode: SiteMode) -> Vec<Post> {
    match mode {
        SiteMode::Blog => {
            posts.sort_by(|a, b| b.publication_date.cmp(&a.publication_date));
        }
        SiteMode::Workshop => {
            posts.retain(Post::in_workshop);
            posts.sort_by_key(|p| (p.phase, p.step));
        }
    }
    posts
}
