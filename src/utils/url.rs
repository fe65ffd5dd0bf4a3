//! Route path helpers.
//!
//! Routes are decoded URL paths with a leading slash; remote object keys
//! never carry one. These helpers keep the two namespaces consistent.

/// Strip leading slash from a URL path
///
/// # Examples
/// ```
/// use stasis::utils::url::strip_leading_slash;
/// assert_eq!(strip_leading_slash("/blog/post"), "blog/post");
/// assert_eq!(strip_leading_slash("blog/post"), "blog/post");
/// assert_eq!(strip_leading_slash("/"), "");
/// ```
#[inline]
pub fn strip_leading_slash(url: &str) -> &str {
    url.trim_start_matches('/')
}

/// Strip trailing slash from a mount prefix
///
/// The root prefix `"/"` collapses to the empty string so that composing
/// `prefix + "/" + relative_path` never produces a double slash.
///
/// # Examples
/// ```
/// use stasis::utils::url::strip_trailing_slash;
/// assert_eq!(strip_trailing_slash("/assets/"), "/assets");
/// assert_eq!(strip_trailing_slash("/assets"), "/assets");
/// assert_eq!(strip_trailing_slash("/"), "");
/// ```
#[inline]
pub fn strip_trailing_slash(prefix: &str) -> &str {
    prefix.trim_end_matches('/')
}

/// Ensure a route path carries a leading slash.
pub fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
