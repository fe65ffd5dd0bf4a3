//! Snapshot fetcher: one GET per discovered route against the ephemeral
//! server.
//!
//! Redirects are never followed (a redirect response is captured as-is) and
//! bodies are taken as raw bytes. Any status code is a valid snapshot; only
//! transport failures abort the run.

use super::FileRecord;
use crate::logger::ProgressLine;
use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};

/// Characters that must be escaped when a route is embedded in a URL path.
const PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Fetch every route and build its [`FileRecord`].
///
/// All fetches run concurrently and all must succeed; the first transport
/// failure aborts the whole run so a partial snapshot is never published.
pub async fn fetch_all(
    base_url: &str,
    routes: &[String],
    default_cache_control: Option<&str>,
) -> Result<Vec<FileRecord>> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("failed to build HTTP client")?;

    let progress = ProgressLine::new("snapshot", &[("fetch", routes.len())]);
    let fetches = routes
        .iter()
        .map(|route| fetch_one(&client, base_url, route, default_cache_control, &progress));
    let records = futures::future::try_join_all(fetches).await?;
    progress.finish();

    Ok(records)
}

async fn fetch_one(
    client: &reqwest::Client,
    base_url: &str,
    route: &str,
    default_cache_control: Option<&str>,
    progress: &ProgressLine,
) -> Result<FileRecord> {
    let url = format!("{base_url}{}", utf8_percent_encode(route, PATH_ENCODE_SET));
    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("failed to fetch {route}"))?;

    let content_type = header_value(&response, CONTENT_TYPE);
    let cache_control =
        header_value(&response, CACHE_CONTROL).or_else(|| default_cache_control.map(String::from));

    let body = response
        .bytes()
        .await
        .with_context(|| format!("failed to read body of {route}"))?
        .to_vec();

    progress.inc("fetch");
    Ok(FileRecord::new(route, body, content_type, cache_control))
}

fn header_value(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
