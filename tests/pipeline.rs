//! End-to-end pipeline tests over in-memory backends and a real ephemeral
//! server.

use stasis::cli::{DeployOptions, deploy};
use stasis::remote::{MemoryCache, MemoryStore};
use stasis::{App, Response, static_files};
use std::fs;
use tempfile::TempDir;

/// The canonical scenario: `/` plus a mounted `public/` directory.
fn build_site(public: &TempDir) -> App {
    let mut app = App::new();
    app.route("/", |_| Response::html("<h1>hi</h1>"));
    app.mount("/static", static_files(public.path()).expect("public dir"));
    app
}

fn public_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
    dir
}

#[tokio::test]
async fn first_deploy_uploads_everything_and_invalidates_once() {
    let public = public_dir();
    let store = MemoryStore::new();
    let cache = MemoryCache::new();

    let summary = deploy(build_site(&public), &DeployOptions::default(), &store, &cache)
        .await
        .unwrap();

    assert_eq!(summary.routes, 2);
    assert_eq!(summary.changed, 2);
    assert!(summary.invalidated);

    // Uploaded under remote keys
    let index = store.object("index.html").expect("index uploaded");
    assert_eq!(index.body, b"<h1>hi</h1>");
    assert_eq!(index.content_type.as_deref(), Some("text/html; charset=utf-8"));
    let logo = store.object("static/logo.png").expect("logo uploaded");
    assert_eq!(logo.content_type.as_deref(), Some("image/png"));

    // Exactly one invalidation, over route strings
    let batches = cache.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].1, vec!["/", "/static/logo.png"]);
}

#[tokio::test]
async fn second_deploy_is_idempotent() {
    let public = public_dir();
    let store = MemoryStore::new();
    let cache = MemoryCache::new();
    let options = DeployOptions::default();

    deploy(build_site(&public), &options, &store, &cache)
        .await
        .unwrap();
    let summary = deploy(build_site(&public), &options, &store, &cache)
        .await
        .unwrap();

    assert_eq!(summary.changed, 0);
    assert!(!summary.invalidated);
    assert_eq!(store.upload_count(), 2, "second run uploads nothing");
    assert_eq!(cache.batches().len(), 1, "second run invalidates nothing");
}

#[tokio::test]
async fn only_changed_content_is_republished() {
    let public = public_dir();
    let store = MemoryStore::new();
    let cache = MemoryCache::new();
    let options = DeployOptions::default();

    deploy(build_site(&public), &options, &store, &cache)
        .await
        .unwrap();

    // Same static file, new page body
    let mut app = App::new();
    app.route("/", |_| Response::html("<h1>hello again</h1>"));
    app.mount("/static", static_files(public.path()).unwrap());

    let summary = deploy(app, &options, &store, &cache).await.unwrap();

    assert_eq!(summary.changed, 1);
    assert_eq!(store.upload_count(), 3);
    let batches = cache.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1].1, vec!["/"]);
    assert_eq!(
        store.object("index.html").unwrap().body,
        b"<h1>hello again</h1>"
    );
}

#[tokio::test]
async fn redirects_and_error_statuses_are_captured_as_is() {
    let store = MemoryStore::new();
    let cache = MemoryCache::new();

    let mut app = App::new();
    app.route("/old", |_| Response::redirect("/new"));
    app.route("/gone", |_| Response::text("it is gone").with_status(410));

    deploy(app, &DeployOptions::default(), &store, &cache)
        .await
        .unwrap();

    // The redirect was not followed; its (empty) body was snapshotted
    let old = store.object("old").expect("redirect captured");
    assert!(old.body.is_empty());

    // Non-2xx bodies are snapshots too, not failures
    let gone = store.object("gone").expect("410 captured");
    assert_eq!(gone.body, b"it is gone");
}

#[tokio::test]
async fn extra_routes_and_default_cache_control_apply() {
    let store = MemoryStore::new();
    let cache = MemoryCache::new();

    let mut app = App::new();
    app.route("/", |_| Response::html("home"));
    app.route("/pinned", |_| {
        Response::html("pinned").with_cache_control("max-age=31536000")
    });
    app.route("/404.html", |_| Response::html("not found").with_status(404));

    let options = DeployOptions {
        // Also reachable as a registered route - first occurrence wins
        extra_routes: vec!["/404.html".to_string()],
        default_cache_control: Some("public, max-age=300".to_string()),
    };

    let summary = deploy(app, &options, &store, &cache).await.unwrap();
    assert_eq!(summary.routes, 3);

    let home = store.object("index.html").unwrap();
    assert_eq!(home.cache_control.as_deref(), Some("public, max-age=300"));

    // An explicit Cache-Control wins over the configured default
    let pinned = store.object("pinned").unwrap();
    assert_eq!(pinned.cache_control.as_deref(), Some("max-age=31536000"));

    assert!(store.object("404.html").is_some());
}
