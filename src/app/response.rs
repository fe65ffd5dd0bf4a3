//! Request and response types for the application facade.

use crate::utils::mime;
use serde::Serialize;

/// An incoming request, as seen by handlers.
///
/// The path is percent-decoded with the query string stripped.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    path: String,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    /// Convenience constructor for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// Uppercase HTTP method ("GET", "HEAD", ...).
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Decoded request path with leading slash, no query string.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A handler response: status, body bytes and the headers the snapshot
/// pipeline cares about, plus any extra headers (e.g. `Location`).
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    body: Vec<u8>,
    content_type: Option<String>,
    cache_control: Option<String>,
    headers: Vec<(String, String)>,
}

impl Response {
    fn with_content_type(status: u16, body: Vec<u8>, content_type: &str) -> Self {
        Self {
            status,
            body,
            content_type: Some(content_type.to_string()),
            cache_control: None,
            headers: Vec::new(),
        }
    }

    /// 200 with `text/html`.
    pub fn html(body: impl Into<String>) -> Self {
        Self::with_content_type(200, body.into().into_bytes(), mime::types::HTML)
    }

    /// 200 with `text/plain`.
    pub fn text(body: impl Into<String>) -> Self {
        Self::with_content_type(200, body.into().into_bytes(), mime::types::PLAIN)
    }

    /// 200 with `application/json`. Serialization failures become a 500.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::with_content_type(200, body, mime::types::JSON),
            Err(e) => Self::text(format!("serialization error: {e}")).with_status(500),
        }
    }

    /// 200 with raw bytes and an explicit content type.
    pub fn bytes(body: Vec<u8>, content_type: &str) -> Self {
        Self::with_content_type(200, body, content_type)
    }

    /// 302 redirect to `location`.
    ///
    /// The snapshot fetcher never follows redirects, so this is captured
    /// as-is when published.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self {
            status: 302,
            body: Vec::new(),
            content_type: None,
            cache_control: None,
            headers: vec![("Location".to_string(), location.into())],
        }
    }

    /// 404 with a plain-text body.
    pub fn not_found() -> Self {
        Self::with_content_type(404, b"404 Not Found".to_vec(), mime::types::PLAIN)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_cache_control(mut self, value: impl Into<String>) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn cache_control(&self) -> Option<&str> {
        self.cache_control.as_deref()
    }

    /// Extra headers beyond content-type / cache-control.
    pub fn extra_headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_defaults() {
        let resp = Response::html("<p>x</p>");
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.content_type(), Some(mime::types::HTML));
        assert_eq!(resp.cache_control(), None);
    }

    #[test]
    fn test_cache_control_builder() {
        let resp = Response::html("x").with_cache_control("public, max-age=60");
        assert_eq!(resp.cache_control(), Some("public, max-age=60"));
    }

    #[test]
    fn test_redirect_carries_location() {
        let resp = Response::redirect("/new");
        assert_eq!(resp.status(), 302);
        assert_eq!(
            resp.extra_headers(),
            &[("Location".to_string(), "/new".to_string())]
        );
    }

    #[test]
    fn test_json_body() {
        let resp = Response::json(&serde_json::json!({"a": 1}));
        assert_eq!(resp.body(), br#"{"a":1}"#);
    }
}
