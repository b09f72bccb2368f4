//! Content document parsing.
//!
//! A content unit is one text document: a `---` delimited YAML header
//! followed by a Markdown body. This module turns the raw document into
//! a flat header map plus rendered HTML; [`crate::normalize`] turns
//! that pair into a [`crate::model::Post`].
//!
//! # Pipeline
//!
//! ```text
//! raw bytes ──▶ frontmatter::split ──▶ (header, body)
//!                      │                     │
//!                      ▼                     ▼
//!             frontmatter::decode    markdown::render
//!                      │                     │
//!                      ▼                     ▼
//!               BTreeMap<k, v>         HTML string
//! ```
//!
//! Media rewriting ([`media`]) runs later, once the normalizer has
//! resolved the slug.

pub mod frontmatter;
pub mod markdown;
pub mod media;

use std::collections::BTreeMap;
use thiserror::Error;

/// Why one content unit was excluded from a rebuild.
///
/// Skips are per-unit and non-fatal: the builder logs them and moves on
/// to the next unit.
#[derive(Debug, Error)]
pub enum UnitSkip {
    #[error("no front matter header")]
    NoFrontMatter,

    #[error("front matter is not a flat mapping: {0}")]
    BadHeader(#[from] serde_yaml::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` holds unparseable date `{value}`")]
    BadDate {
        field: &'static str,
        value: String,
    },

    #[error("rendered markup is not rewritable")]
    BadMarkup(#[source] quick_xml::Error),
}

/// Parse one content document into its header map and rendered body.
///
/// Returns [`UnitSkip::NoFrontMatter`] when the document does not open
/// with the delimiter line, and [`UnitSkip::BadHeader`] when the header
/// does not decode as a mapping.
pub fn parse_document(text: &str) -> Result<(BTreeMap<String, String>, String), UnitSkip> {
    let (header, body) = frontmatter::split(text).ok_or(UnitSkip::NoFrontMatter)?;
    let fields = frontmatter::decode(&header)?;
    let html = markdown::render(body);
    Ok((fields, html))
}
