//! End-to-end engine tests over a local content tree.

use postr::config::PostrConfig;
use postr::engine::{Engine, RebuildOutcome};
use postr::model::SiteMode;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Write one post directory with the given front matter lines and body.
fn write_post(root: &Path, dir: &str, header: &[(&str, &str)], body: &str) {
    let post_dir = root.join(dir);
    fs::create_dir_all(&post_dir).unwrap();

    let mut doc = String::from("---\n");
    for (key, value) in header {
        doc.push_str(&format!("{key}: {value}\n"));
    }
    doc.push_str("---\n\n");
    doc.push_str(body);

    fs::write(post_dir.join("index.md"), doc).unwrap();
}

fn blog_header<'a>(slug: &'a str, date: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("slug", slug),
        ("title", "A Title"),
        ("author", "Jane Doe"),
        ("pubDate", date),
        ("lastModified", date),
        ("description", "A short summary"),
    ]
}

fn engine_for(root: &Path, mode: SiteMode) -> Engine {
    let mut config = PostrConfig::default();
    config.content.root = root.to_path_buf();
    config.site.mode = mode;
    Engine::new(config)
}

#[tokio::test]
async fn round_trip_preserves_declared_fields() {
    let tmp = TempDir::new().unwrap();
    write_post(
        tmp.path(),
        "my-post",
        &[
            ("slug", "my-post"),
            ("title", "My Post"),
            ("author", "Jane Doe"),
            ("pubDate", "2021-01-15"),
            ("lastModified", "2021-01-16T08:30:00"),
            ("description", "A short summary"),
            ("categories", "Tech, tutorials "),
        ],
        "Intro text with ![a pic](media/pic.png) inline.\n",
    );

    let engine = engine_for(tmp.path(), SiteMode::Blog);
    let outcome = engine.reindex().await.unwrap();
    assert_eq!(outcome, RebuildOutcome::Completed { posts: 1 });

    let post = engine.service().post_by_slug("my-post").unwrap();
    assert_eq!(post.slug, "my-post");
    assert_eq!(post.title, "My Post");
    assert_eq!(post.author, "Jane Doe");
    assert_eq!(post.description, "A short summary");
    assert_eq!(post.publication_date.to_string(), "2021-01-15 00:00:00");
    assert_eq!(post.last_modified.to_string(), "2021-01-16 08:30:00");
    assert_eq!(post.categories, vec!["tech", "tutorials"]);
    assert!(post.content.contains(r#"src="/posts/my-post/media/pic.png""#));
    assert!(!post.content.contains(r#"src="media/"#));
}

#[tokio::test]
async fn malformed_unit_skipped_rest_published() {
    let tmp = TempDir::new().unwrap();
    for (slug, date) in [
        ("one", "2021-01-01"),
        ("two", "2021-01-02"),
        ("three", "2021-01-03"),
        ("four", "2021-01-04"),
    ] {
        write_post(tmp.path(), slug, &blog_header(slug, date), "Body.\n");
    }
    write_post(
        tmp.path(),
        "broken",
        &blog_header("broken", "not-a-date"),
        "Body.\n",
    );

    let engine = engine_for(tmp.path(), SiteMode::Blog);
    let outcome = engine.reindex().await.unwrap();

    assert_eq!(outcome, RebuildOutcome::Completed { posts: 4 });
    assert!(engine.service().post_by_slug("broken").is_none());
    assert_eq!(engine.service().post_count(None), 4);
}

#[tokio::test]
async fn blog_order_is_newest_first() {
    let tmp = TempDir::new().unwrap();
    write_post(tmp.path(), "old", &blog_header("old", "2020-06-01"), "");
    write_post(tmp.path(), "new", &blog_header("new", "2021-06-01"), "");
    write_post(tmp.path(), "mid", &blog_header("mid", "2020-12-01"), "");

    let engine = engine_for(tmp.path(), SiteMode::Blog);
    engine.reindex().await.unwrap();

    let posts = engine.service().get_posts(0, -1, None);
    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["new", "mid", "old"]);

    for pair in posts.windows(2) {
        assert!(pair[0].publication_date >= pair[1].publication_date);
    }

    // Adjacency follows published order: "next" is the newer neighbor.
    let (previous, next) = engine.service().adjacent("mid");
    assert_eq!(next.unwrap().slug, "new");
    assert_eq!(previous.unwrap().slug, "old");
}

#[tokio::test]
async fn workshop_mode_orders_by_phase_and_step() {
    let tmp = TempDir::new().unwrap();
    let mut header = blog_header("setup-1", "2021-01-01");
    header.extend([("phase", "1"), ("step", "1"), ("categories", "Setup")]);
    write_post(tmp.path(), "setup-1", &header, "");

    let mut header = blog_header("setup-2", "2021-01-02");
    header.extend([("phase", "1"), ("step", "2"), ("categories", "Setup")]);
    write_post(tmp.path(), "setup-2", &header, "");

    let mut header = blog_header("deploy-1", "2021-01-03");
    header.extend([("phase", "2"), ("step", "1"), ("categories", "Deploy")]);
    write_post(tmp.path(), "deploy-1", &header, "");

    // No phase/step: normalizes fine, dropped by the workshop filter.
    write_post(
        tmp.path(),
        "aside",
        &blog_header("aside", "2021-01-04"),
        "",
    );

    let engine = engine_for(tmp.path(), SiteMode::Workshop);
    let outcome = engine.reindex().await.unwrap();
    assert_eq!(outcome, RebuildOutcome::Completed { posts: 3 });

    let service = engine.service();
    let order: Vec<_> = service
        .get_posts(0, -1, None)
        .iter()
        .map(|p| (p.slug.clone(), p.phase, p.step))
        .collect();
    assert_eq!(
        order,
        vec![
            ("setup-1".to_string(), 1, 1),
            ("setup-2".to_string(), 1, 2),
            ("deploy-1".to_string(), 2, 1),
        ]
    );

    assert!(service.get_posts(0, -1, None).iter().all(|p| p.phase > 0 && p.step > 0));
    assert_eq!(service.categories(), vec!["setup", "deploy"]);
}

#[tokio::test]
async fn empty_and_missing_sources_publish_empty_snapshots() {
    let tmp = TempDir::new().unwrap();
    let engine = engine_for(tmp.path(), SiteMode::Blog);
    assert_eq!(
        engine.reindex().await.unwrap(),
        RebuildOutcome::Completed { posts: 0 }
    );

    let engine = engine_for(Path::new("/nonexistent/postr-root"), SiteMode::Blog);
    assert_eq!(
        engine.reindex().await.unwrap(),
        RebuildOutcome::Completed { posts: 0 }
    );
    assert!(engine.service().get_posts(0, 10, None).is_empty());
}

#[tokio::test]
async fn reindex_picks_up_new_units() {
    let tmp = TempDir::new().unwrap();
    write_post(tmp.path(), "first", &blog_header("first", "2021-01-01"), "");

    let engine = engine_for(tmp.path(), SiteMode::Blog);
    engine.reindex().await.unwrap();
    assert_eq!(engine.service().post_count(None), 1);

    write_post(tmp.path(), "second", &blog_header("second", "2021-02-01"), "");
    engine.reindex().await.unwrap();

    assert_eq!(engine.service().post_count(None), 2);
    assert_eq!(engine.service().latest_post().unwrap().slug, "second");
}

#[tokio::test]
async fn queries_never_observe_a_partial_snapshot() {
    let tmp = TempDir::new().unwrap();
    for (slug, date) in [
        ("one", "2021-01-01"),
        ("two", "2021-01-02"),
        ("three", "2021-01-03"),
        ("four", "2021-01-04"),
    ] {
        write_post(tmp.path(), slug, &blog_header(slug, date), "Body.\n");
    }

    let engine = Arc::new(engine_for(tmp.path(), SiteMode::Blog));
    engine.reindex().await.unwrap();

    let rebuilder = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move {
            for _ in 0..20 {
                // AlreadyRunning is fine; the point is publish churn.
                let _ = engine.reindex().await;
            }
        }
    });

    let service = engine.service();
    for _ in 0..200 {
        let posts = service.get_posts(0, -1, None);
        // Complete snapshot or nothing: never a half-built list.
        assert_eq!(posts.len(), 4);
        for pair in posts.windows(2) {
            assert!(pair[0].publication_date >= pair[1].publication_date);
        }
        tokio::task::yield_now().await;
    }

    rebuilder.await.unwrap();
}

#[tokio::test]
async fn category_queries_and_pagination() {
    let tmp = TempDir::new().unwrap();
    let mut header = blog_header("a", "2021-01-03");
    header.push(("categories", "rust, web"));
    write_post(tmp.path(), "a", &header, "");

    let mut header = blog_header("b", "2021-01-02");
    header.push(("categories", "rust"));
    write_post(tmp.path(), "b", &header, "");

    let mut header = blog_header("c", "2021-01-01");
    header.push(("categories", "life"));
    write_post(tmp.path(), "c", &header, "");

    let engine = engine_for(tmp.path(), SiteMode::Blog);
    engine.reindex().await.unwrap();
    let service = engine.service();

    assert_eq!(service.post_count(Some("rust")), 2);
    assert_eq!(service.post_count(Some("RUST")), 2);

    let rust_posts = service.get_posts(0, 1, Some("rust"));
    assert_eq!(rust_posts.len(), 1);
    assert_eq!(rust_posts[0].slug, "a");

    assert!(service.get_posts(5, 10, None).is_empty());

    // rust used twice, web/life once each, ties in encounter order.
    assert_eq!(service.categories(), vec!["rust", "web", "life"]);
}
