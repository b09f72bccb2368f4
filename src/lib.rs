//! Postr - a content indexing and query engine for markdown posts.
//!
//! Content units (YAML front matter + markdown body) are scanned from
//! a local directory tree or an S3-compatible bucket, normalized into
//! [`model::Post`] entities, and published as immutable, sorted
//! snapshots. Queries always read a complete snapshot; a background
//! scheduler keeps the index fresh.

pub mod cli;
pub mod config;
pub mod content;
pub mod engine;
pub mod index;
pub mod model;
pub mod normalize;
pub mod refresh;
pub mod source;
pub mod utils;
