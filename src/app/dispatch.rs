//! Request dispatch: routes, mounted middleware, static mounts.

use super::{App, Request, Response};
use crate::utils::{mime, url::strip_trailing_slash};
use std::fs;
use std::path::{Path, PathBuf};

/// Produce the response for a request.
///
/// Order mirrors registration semantics: exact dynamic route first, then
/// mounted middleware in mount order, then static mounts in mount order.
pub(super) fn dispatch(app: &App, request: &Request) -> Response {
    if let Some(handler) = app.handler(request.path()) {
        return handler(request);
    }

    for (prefix, handler) in app.mounted_middleware() {
        if prefix_rest(request.path(), prefix).is_some() {
            return handler(request);
        }
    }

    for mount in app.static_mounts() {
        if let Some(rest) = prefix_rest(request.path(), &mount.prefix)
            && let Some(file) = resolve_static(&mount.dir, rest)
        {
            return match fs::read(&file) {
                Ok(body) => Response::bytes(body, mime::from_path(&file)),
                Err(e) => Response::text(format!("error reading {}: {e}", file.display()))
                    .with_status(500),
            };
        }
    }

    Response::not_found()
}

/// If `path` falls under `prefix`, return the remainder (no leading slash).
///
/// `prefix_rest("/assets/a.css", "/assets")` is `Some("a.css")`;
/// the root prefix `"/"` matches everything.
fn prefix_rest<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let prefix = strip_trailing_slash(prefix);
    if prefix.is_empty() {
        return Some(path.trim_start_matches('/'));
    }
    match path.strip_prefix(prefix) {
        Some("") => Some(""),
        Some(rest) => rest.strip_prefix('/'),
        None => None,
    }
}

/// Resolve a relative request path against a mount directory.
///
/// Canonicalizes and verifies the result is still under the mount root,
/// rejecting traversal via `..` or symlinks. Directories fall back to their
/// `index.html`.
fn resolve_static(root: &Path, rest: &str) -> Option<PathBuf> {
    if rest.contains("..") {
        return None;
    }

    let local = root.join(rest.trim_matches('/'));

    let canonical = local.canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        // Path escapes the mount root - reject
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::static_files;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "body{}").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.js"), "1;").unwrap();
        dir
    }

    #[test]
    fn test_prefix_rest() {
        assert_eq!(prefix_rest("/assets/a.css", "/assets"), Some("a.css"));
        assert_eq!(prefix_rest("/assets", "/assets"), Some(""));
        assert_eq!(prefix_rest("/assetsX/a", "/assets"), None);
        assert_eq!(prefix_rest("/other/a", "/assets"), None);
        assert_eq!(prefix_rest("/anything/x", "/"), Some("anything/x"));
    }

    #[test]
    fn test_static_dispatch() {
        let dir = fixture();
        let mut app = App::new();
        app.mount("/static", static_files(dir.path()).unwrap());

        let resp = app.handle(&Request::get("/static/a.css"));
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.body(), b"body{}");
        assert_eq!(resp.content_type(), Some(mime::types::CSS));

        let resp = app.handle(&Request::get("/static/sub/b.js"));
        assert_eq!(resp.body(), b"1;");
    }

    #[test]
    fn test_route_wins_over_static() {
        let dir = fixture();
        let mut app = App::new();
        app.route("/static/a.css", |_| Response::text("handler"));
        app.mount("/static", static_files(dir.path()).unwrap());

        let resp = app.handle(&Request::get("/static/a.css"));
        assert_eq!(resp.body(), b"handler");
    }

    #[test]
    fn test_traversal_is_rejected() {
        let dir = fixture();
        let mut app = App::new();
        app.mount("/static", static_files(dir.path()).unwrap());

        let resp = app.handle(&Request::get("/static/../etc/passwd"));
        assert_eq!(resp.status(), 404);
    }

    #[test]
    fn test_unknown_path_is_404() {
        let app = App::new();
        assert_eq!(app.handle(&Request::get("/nope")).status(), 404);
    }
}
