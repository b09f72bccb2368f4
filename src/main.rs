//! Postr CLI - index markdown content and query the result.

use anyhow::{Result, bail};
use clap::Parser;
use postr::cli::{Cli, Commands};
use postr::config::PostrConfig;
use postr::engine::Engine;
use postr::index::query::PostService;
use postr::log;
use postr::refresh::run_scheduler;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let engine = Arc::new(Engine::new(config));

    match &cli.command {
        Commands::Index => {
            engine.reindex().await?;
            Ok(())
        }
        Commands::List {
            category,
            offset,
            limit,
            json,
        } => {
            engine.reindex().await?;
            list_posts(&engine, category.as_deref(), *offset, *limit, *json)
        }
        Commands::Show { slug, json } => {
            engine.reindex().await?;
            show_post(&engine.service(), slug, *json)
        }
        Commands::Categories { json } => {
            engine.reindex().await?;
            let categories = engine.service().categories();
            if *json {
                println!("{}", serde_json::to_string_pretty(&categories)?);
            } else {
                for category in categories {
                    println!("{category}");
                }
            }
            Ok(())
        }
        Commands::Run => run_engine(engine).await,
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<PostrConfig> {
    let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        PostrConfig::from_path(&config_path)?
    } else {
        PostrConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

/// Print a page of posts.
fn list_posts(
    engine: &Engine,
    category: Option<&str>,
    offset: i64,
    limit: Option<i64>,
    json: bool,
) -> Result<()> {
    let service = engine.service();
    let limit = limit.unwrap_or(engine.config().site.page_size);
    let posts = service.get_posts(offset, limit, category);

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    for post in &posts {
        println!(
            "{}  {:<24}  {}",
            post.publication_date.format("%Y-%m-%d"),
            post.slug,
            post.title
        );
    }
    log!("postr"; "{} of {} posts", posts.len(), service.post_count(category));
    Ok(())
}

/// Print one post and its neighbors.
fn show_post(service: &PostService, slug: &str, json: bool) -> Result<()> {
    let Some(post) = service.post_by_slug(slug) else {
        bail!("no post with slug `{slug}`");
    };
    let (previous, next) = service.adjacent(slug);

    if json {
        let out = serde_json::json!({
            "post": post,
            "previous": previous.map(|p| p.slug),
            "next": next.map(|p| p.slug),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", post.title);
    println!("by {} on {}", post.author, post.publication_date.format("%Y-%m-%d"));
    println!("{}", post.description);
    if !post.categories.is_empty() {
        println!("categories: {}", post.categories.join(", "));
    }
    if let Some(next) = next {
        println!("next: {}", next.slug);
    }
    if let Some(previous) = previous {
        println!("previous: {}", previous.slug);
    }
    Ok(())
}

/// Index once, then keep the scheduler running until Ctrl+C.
async fn run_engine(engine: Arc<Engine>) -> Result<()> {
    // A failed initial rebuild is not fatal: serve the empty snapshot
    // and let the scheduler retry.
    if let Err(err) = engine.reindex().await {
        log!("error"; "initial index failed: {err}");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = tokio::spawn(run_scheduler(Arc::clone(&engine), shutdown_rx));

    tokio::signal::ctrl_c().await?;
    log!("postr"; "shutting down...");
    let _ = shutdown_tx.send(true);
    scheduler.await?;

    Ok(())
}
