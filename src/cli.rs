//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Postr content indexing and query engine CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: postr.toml)
    #[arg(short = 'C', long, default_value = "postr.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rebuild the index once and report what was published
    Index,

    /// List indexed posts in published order
    List {
        /// Only posts in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Posts to skip from the head of the list
        #[arg(long, default_value_t = 0)]
        offset: i64,

        /// Maximum posts to print (defaults to the configured page size)
        #[arg(short, long)]
        limit: Option<i64>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one post by slug, with its neighbors
    Show {
        /// The post's slug
        slug: String,

        /// Emit the full post as JSON
        #[arg(long)]
        json: bool,
    },

    /// List distinct categories in rank order
    Categories {
        /// Emit JSON instead of lines
        #[arg(long)]
        json: bool,
    },

    /// Index, then keep refreshing on the configured interval until Ctrl+C
    Run,
}

impl Cli {
    pub const fn is_run(&self) -> bool {
        matches!(self.command, Commands::Run)
    }
}
