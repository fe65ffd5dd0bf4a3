//! Route expansion: dynamic routes plus static-mount directory listings,
//! flattened into concrete URL paths.

use crate::app::StaticMount;
use crate::debug;
use crate::utils::url::strip_trailing_slash;
use jwalk::WalkDir;
use rustc_hash::FxHashSet;
use std::path::Path;

/// Expand dynamic routes and static mounts into a flat route list.
///
/// Dynamic routes come first, verbatim; then every regular file under each
/// mount, mounts in registration order. File order within a mount is sorted
/// per directory for determinism, though nothing downstream depends on it.
/// The result may contain duplicates; see [`dedup_first_wins`].
pub fn expand(routes: &[String], mounts: &[StaticMount]) -> Vec<String> {
    let mut expanded: Vec<String> = routes.to_vec();

    for mount in mounts {
        let prefix = strip_trailing_slash(&mount.prefix);
        for rel in list_files(&mount.dir) {
            expanded.push(format!("{prefix}/{rel}"));
        }
    }

    expanded
}

/// Relative paths (forward-slash separated) of every regular file under
/// `root`, sorted per directory.
fn list_files(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let path = e.path();
            let rel = path.strip_prefix(root).ok()?;
            let parts: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            Some(parts.join("/"))
        })
        .collect()
}

/// Deduplicate an expanded route list, keeping the first occurrence.
///
/// Dynamic routes precede static files in the expanded list, so an
/// explicitly registered handler takes precedence over a same-named mounted
/// file. Dropped duplicates are logged.
pub fn dedup_first_wins(expanded: Vec<String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut result = Vec::with_capacity(expanded.len());
    for route in expanded {
        if seen.insert(route.clone()) {
            result.push(route);
        } else {
            debug!("routes"; "duplicate route {} (first occurrence wins)", route);
        }
    }
    result
}

/// Derive the remote object key for a route.
///
/// The root route maps to `index.html`; every other route is its path with
/// the leading slash stripped. Remote keys never carry a leading slash -
/// invalidation paths always do.
pub fn remote_key(route: &str) -> String {
    if route == "/" {
        "index.html".to_string()
    } else {
        route.trim_start_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn mount(prefix: &str, dir: PathBuf) -> StaticMount {
        StaticMount {
            prefix: prefix.to_string(),
            dir,
        }
    }

    #[test]
    fn test_expansion_completeness() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.js"), "y").unwrap();

        let expanded = expand(&[], &[mount("/assets", dir.path().to_path_buf())]);

        // Order-insensitive check
        let set: FxHashSet<_> = expanded.iter().map(String::as_str).collect();
        assert_eq!(expanded.len(), 2);
        assert!(set.contains("/assets/a.css"));
        assert!(set.contains("/assets/sub/b.js"));
    }

    #[test]
    fn test_dynamic_routes_come_first() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f.txt"), "x").unwrap();

        let routes = vec!["/".to_string(), "/about".to_string()];
        let expanded = expand(&routes, &[mount("/files", dir.path().to_path_buf())]);
        assert_eq!(expanded, vec!["/", "/about", "/files/f.txt"]);
    }

    #[test]
    fn test_root_mount_has_no_double_slash() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("robots.txt"), "x").unwrap();

        let expanded = expand(&[], &[mount("/", dir.path().to_path_buf())]);
        assert_eq!(expanded, vec!["/robots.txt"]);
    }

    #[test]
    fn test_trailing_slash_prefix_is_normalized() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "x").unwrap();

        let expanded = expand(&[], &[mount("/assets/", dir.path().to_path_buf())]);
        assert_eq!(expanded, vec!["/assets/a.css"]);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let routes = vec![
            "/a".to_string(),
            "/b".to_string(),
            "/a".to_string(),
            "/c".to_string(),
            "/b".to_string(),
        ];
        assert_eq!(dedup_first_wins(routes), vec!["/a", "/b", "/c"]);
    }

    #[test]
    fn test_remote_key_mapping() {
        assert_eq!(remote_key("/"), "index.html");
        assert_eq!(remote_key("/about"), "about");
        assert_eq!(remote_key("/static/logo.png"), "static/logo.png");
    }
}
