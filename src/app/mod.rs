//! Application facade with transparent route recording.
//!
//! The host application is built through [`App`] instead of a third-party
//! framework entry point: every route registration and static mount is
//! recorded as a side effect, and the app still serves requests normally
//! (via [`App::listen`] or the ephemeral snapshot server). Static-file
//! middleware is an explicit [`Middleware`] variant carrying the resolved
//! directory path, so no runtime type-probing is needed to tell it apart
//! from ordinary middleware.

mod dispatch;
mod response;

pub use response::{Request, Response};

use crate::utils::url::with_leading_slash;
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// A request handler: borrows the request, returns a full response.
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

/// A mountable middleware value.
///
/// `Dynamic` handlers pass through the recorder untouched; `StaticDir`
/// carries the canonicalized directory root so mounting it records a
/// [`StaticMount`].
pub enum Middleware {
    /// Ordinary middleware: handles every request under its mount prefix.
    Dynamic(Handler),
    /// Serve a directory of files (created via [`static_files`]).
    StaticDir(PathBuf),
}

/// A recorded (mount prefix, directory root) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMount {
    /// Mount prefix with leading slash (`"/"` for a root mount).
    pub prefix: String,
    /// Canonicalized directory root.
    pub dir: PathBuf,
}

/// Static-file middleware factory.
///
/// Resolves `dir` to an absolute path immediately; a missing or unreadable
/// directory is an application-load error and propagates to the caller.
pub fn static_files(dir: impl AsRef<Path>) -> Result<Middleware> {
    let dir = dir.as_ref();
    let resolved = dir
        .canonicalize()
        .with_context(|| format!("static directory not found: {}", dir.display()))?;
    Ok(Middleware::StaticDir(resolved))
}

/// The web application under snapshot.
///
/// Behaves as a small Express-shaped app; additionally records every
/// registered route path and every static mount, in registration order.
#[derive(Default)]
pub struct App {
    routes: Vec<String>,
    handlers: FxHashMap<String, Handler>,
    mounted: Vec<(String, Handler)>,
    mounts: Vec<StaticMount>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dynamic route at `path`.
    ///
    /// Registering the same path twice replaces the handler; the route is
    /// recorded once.
    pub fn route(
        &mut self,
        path: &str,
        handler: impl Fn(&Request) -> Response + Send + Sync + 'static,
    ) -> &mut Self {
        let path = with_leading_slash(path);
        if self.handlers.insert(path.clone(), Box::new(handler)).is_none() {
            self.routes.push(path);
        }
        self
    }

    /// Mount middleware at `prefix`.
    ///
    /// A `StaticDir` is recorded as a [`StaticMount`]; dynamic middleware
    /// participates in dispatch but is not snapshotted.
    pub fn mount(&mut self, prefix: &str, middleware: Middleware) -> &mut Self {
        let prefix = with_leading_slash(prefix);
        match middleware {
            Middleware::StaticDir(dir) => self.mounts.push(StaticMount { prefix, dir }),
            Middleware::Dynamic(handler) => self.mounted.push((prefix, handler)),
        }
        self
    }

    /// Mount middleware at the root (the single-argument mount form).
    pub fn attach(&mut self, middleware: Middleware) -> &mut Self {
        self.mount("/", middleware)
    }

    /// Serve the application on a fixed interface/port (the host's normal
    /// run mode). Blocks until Ctrl+C.
    pub fn listen(self, interface: IpAddr, port: u16) -> Result<()> {
        crate::server::serve_blocking(self, interface, port)
    }

    /// Dynamic route paths, in registration order.
    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    /// Static mounts, in registration order.
    pub fn static_mounts(&self) -> &[StaticMount] {
        &self.mounts
    }

    /// Produce the response for a request (route, then mounted middleware,
    /// then static mounts, then 404).
    pub fn handle(&self, request: &Request) -> Response {
        dispatch::dispatch(self, request)
    }

    pub(crate) fn handler(&self, path: &str) -> Option<&Handler> {
        self.handlers.get(path)
    }

    pub(crate) fn mounted_middleware(&self) -> &[(String, Handler)] {
        &self.mounted
    }
}
