//! Content source providers.
//!
//! A source enumerates content units (one primary document per post)
//! and yields their raw bytes. Two interchangeable backends implement
//! one contract:
//!
//! | Backend             | Unit                                      |
//! |---------------------|-------------------------------------------|
//! | [`local::LocalSource`] | `<root>/<subdir>/<document>` on disk   |
//! | [`s3::S3Source`]    | bucket object whose key ends in `<document>` |
//!
//! An empty or missing source yields zero units; only an unreachable
//! store is an error, and that error aborts the rebuild attempt as a
//! whole (the previously published snapshot stays live).

pub mod local;
pub mod s3;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Handle for one enumerated content unit. The name is a root-relative
/// path (local backend) or object key (remote backend), used both to
/// read the unit back and as log context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    pub name: String,
}

impl ContentUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Source-level failures. Listing failures abort the rebuild attempt;
/// read failures are handled per unit by the index builder.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("content root `{0}` is not listable")]
    Unlistable(PathBuf, #[source] std::io::Error),

    #[error("unit `{0}` is not readable")]
    Unreadable(String, #[source] std::io::Error),

    #[error("object store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("object store returned HTTP {status} for {context}")]
    Api { status: u16, context: String },

    #[error("`{0}` environment variable not set")]
    Credentials(&'static str),

    #[error("object listing response is malformed")]
    BadListing(#[source] quick_xml::Error),
}

/// One content backend: enumerate units, read a unit's bytes.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable location, for log context.
    fn describe(&self) -> String;

    /// Enumerate all content units. Empty sources yield an empty list.
    async fn list_units(&self) -> Result<Vec<ContentUnit>, SourceError>;

    /// Read one unit's raw bytes.
    async fn read_unit(&self, unit: &ContentUnit) -> Result<Vec<u8>, SourceError>;
}
