//! Per-route file records, ready for diffing and upload.

use super::Fingerprint;
use crate::routes::remote_key;

/// One snapshotted route: the object to publish and its identity.
///
/// Every record is published with a public-read ACL; there is no per-record
/// override. The `route` string (leading slash intact) feeds cache
/// invalidation, while `remote_key` names the stored object - the two
/// namespaces are never mixed.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Discovered route, e.g. `/static/logo.png`.
    pub route: String,
    /// Object key, e.g. `static/logo.png` (`index.html` for `/`).
    pub remote_key: String,
    /// Raw response body.
    pub body: Vec<u8>,
    /// `Content-Type` captured from the response, if any.
    pub content_type: Option<String>,
    /// `Cache-Control` captured from the response (or the configured
    /// default), if any.
    pub cache_control: Option<String>,
    /// Content fingerprint over body + the two headers above.
    pub fingerprint: Fingerprint,
}

impl FileRecord {
    pub fn new(
        route: impl Into<String>,
        body: Vec<u8>,
        content_type: Option<String>,
        cache_control: Option<String>,
    ) -> Self {
        let route = route.into();
        let fingerprint =
            Fingerprint::compute(&body, content_type.as_deref(), cache_control.as_deref());
        Self {
            remote_key: remote_key(&route),
            route,
            body,
            content_type,
            cache_control,
            fingerprint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_route_maps_to_index_html() {
        let record = FileRecord::new("/", b"<h1>hi</h1>".to_vec(), None, None);
        assert_eq!(record.remote_key, "index.html");
        assert_eq!(record.route, "/");
    }

    #[test]
    fn test_leading_slash_stripped_from_key() {
        let record = FileRecord::new("/static/logo.png", vec![1, 2, 3], None, None);
        assert_eq!(record.remote_key, "static/logo.png");
    }

    #[test]
    fn test_fingerprint_reflects_headers() {
        let a = FileRecord::new("/a", b"x".to_vec(), Some("text/css".into()), None);
        let b = FileRecord::new("/a", b"x".to_vec(), Some("text/html".into()), None);
        assert_ne!(a.fingerprint, b.fingerprint);
    }
}
