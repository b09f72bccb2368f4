//! Site configuration management for `postr.toml`.
//!
//! # Sections
//!
//! | Section        | Purpose                                        |
//! |----------------|------------------------------------------------|
//! | `[site]`       | Site metadata, mode, page size                 |
//! | `[content]`    | Backend selection, content root, media rewrite |
//! | `[content.s3]` | Remote object-store backend settings           |
//! | `[refresh]`    | Background reindex interval                    |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Blog"
//! author = "Jane Doe"
//! mode = "blog"
//! page_size = 10
//!
//! [content]
//! backend = "local"
//! root = "posts"
//! document = "index.md"
//!
//! [refresh]
//! interval_minutes = 5
//! ```

pub mod defaults;
mod error;

pub use error::ConfigError;

use crate::cli::Cli;
use crate::model::SiteMode;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing postr.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PostrConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site metadata and mode
    #[serde(default)]
    pub site: SiteConfig,

    /// Content backend settings
    #[serde(default)]
    pub content: ContentConfig,

    /// Background refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,
}

/// `[site]` section - site metadata, mode and paging.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, used in CLI output headers.
    #[serde(default)]
    pub title: String,

    /// Main author of the site.
    #[serde(default)]
    pub author: String,

    /// External root of the site (e.g. `https://example.com/blog`).
    #[serde(default = "defaults::site::url")]
    #[educe(Default = defaults::site::url())]
    pub url: Option<String>,

    /// Ordering mode: chronological blog or phase/step workshop.
    #[serde(default)]
    pub mode: SiteMode,

    /// Items per page in paged listings.
    #[serde(default = "defaults::site::page_size")]
    #[educe(Default = defaults::site::page_size())]
    pub page_size: i64,
}

/// Content backend selector for `[content] backend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    S3,
}

/// `[content]` section - where content units come from and how media
/// references are rewritten.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Which backend serves content units.
    #[serde(default)]
    pub backend: Backend,

    /// Local backend: directory whose immediate subdirectories are posts.
    #[serde(default = "defaults::content::root")]
    #[educe(Default = defaults::content::root())]
    pub root: PathBuf,

    /// Designated per-unit document name.
    #[serde(default = "defaults::content::document")]
    #[educe(Default = defaults::content::document())]
    pub document: String,

    /// Path template for rewritten media references. Must contain the
    /// `{slug}` placeholder.
    #[serde(default = "defaults::content::media_path")]
    #[educe(Default = defaults::content::media_path())]
    pub media_path: String,

    /// Remote backend settings, used when `backend = "s3"`.
    #[serde(default)]
    pub s3: S3Config,
}

/// `[content.s3]` section - S3-compatible object store settings.
///
/// Credentials are read from `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`
/// (and optionally `AWS_SESSION_TOKEN`) rather than the config file.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct S3Config {
    /// Bucket holding the content units.
    #[serde(default)]
    pub bucket: String,

    /// Bucket region.
    #[serde(default = "defaults::content::s3::region")]
    #[educe(Default = defaults::content::s3::region())]
    pub region: String,

    /// Optional key prefix to list under.
    #[serde(default)]
    pub prefix: String,

    /// Custom endpoint for S3-compatible services (MinIO, LocalStack).
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

/// `[refresh]` section - background reindex interval.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RefreshConfig {
    /// Minutes between automatic rebuilds. A value <= 0 disables the
    /// scheduler entirely.
    #[serde(default = "defaults::refresh::interval_minutes")]
    #[educe(Default = defaults::refresh::interval_minutes())]
    pub interval_minutes: i64,
}

impl PostrConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: PostrConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = normalize_path(path);
        Ok(config)
    }

    /// Apply CLI overrides and anchor relative paths at the project root.
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));

        if let Some(content_root) = &cli.content {
            self.content.root = content_root.clone();
        }

        let root = normalize_path(&root);
        self.config_path = normalize_path(&root.join(&cli.config));
        self.content.root = normalize_path(&root.join(&self.content.root));
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> Result<()> {
        if self.site.page_size <= 0 {
            bail!(ConfigError::Validation(
                "[site.page_size] must be positive".into()
            ));
        }

        if !self.content.media_path.contains("{slug}") {
            bail!(ConfigError::Validation(
                "[content.media_path] must contain the {slug} placeholder".into()
            ));
        }

        if self.content.document.is_empty() {
            bail!(ConfigError::Validation(
                "[content.document] must not be empty".into()
            ));
        }

        if self.content.backend == Backend::S3 && self.content.s3.bucket.is_empty() {
            bail!(ConfigError::Validation(
                "[content.s3.bucket] is required when backend = \"s3\"".into()
            ));
        }

        Ok(())
    }

    /// Instantiate the media path template for a slug.
    pub fn media_path_for(&self, slug: &str) -> String {
        self.content.media_path.replace("{slug}", slug)
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, manually make them absolute
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
