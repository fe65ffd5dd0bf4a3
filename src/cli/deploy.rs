//! The snapshot → diff → publish pipeline.

use crate::app::App;
use crate::diff;
use crate::log;
use crate::publish::{self, DeploySummary};
use crate::remote::{EdgeCache, ObjectStore};
use crate::routes;
use crate::server::EphemeralServer;
use crate::snapshot;
use crate::utils::url::with_leading_slash;
use anyhow::Result;

/// Snapshot behavior, resolved from `stasis.toml`.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Routes to fetch in addition to the discovered ones.
    pub extra_routes: Vec<String>,
    /// `Cache-Control` for records whose response carried none.
    pub default_cache_control: Option<String>,
}

/// Run the whole pipeline against the given remote backends.
///
/// Stages run strictly in order: expansion, then every fetch, then every
/// remote-state lookup, then every upload, then the single invalidation.
/// The ephemeral server is torn down on every exit path before the result
/// (or error) propagates to the caller.
pub async fn deploy(
    app: App,
    options: &DeployOptions,
    store: &dyn ObjectStore,
    cache: &dyn EdgeCache,
) -> Result<DeploySummary> {
    let mut dynamic: Vec<String> = app.routes().to_vec();
    dynamic.extend(options.extra_routes.iter().map(|r| with_leading_slash(r)));

    let expanded = routes::expand(&dynamic, app.static_mounts());
    let routes = routes::dedup_first_wins(expanded);
    log!("snapshot"; "{} route(s) discovered", routes.len());

    let server = EphemeralServer::start(app)?;
    let result = run_stages(server.base_url(), &routes, options, store, cache).await;
    server.shutdown();
    result
}

async fn run_stages(
    base_url: &str,
    routes: &[String],
    options: &DeployOptions,
    store: &dyn ObjectStore,
    cache: &dyn EdgeCache,
) -> Result<DeploySummary> {
    let records =
        snapshot::fetch_all(base_url, routes, options.default_cache_control.as_deref()).await?;

    let changes = diff::diff(records, store).await?;
    let summary = DeploySummary {
        routes: routes.len(),
        changed: changes.len(),
        invalidated: !changes.is_empty(),
    };

    publish::publish(&changes, store, cache).await?;
    Ok(summary)
}
