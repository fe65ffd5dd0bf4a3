//! Stasis - snapshot a live web app into static assets and publish them.
//!
//! The host application is constructed through the [`App`] facade, which
//! records every route registration and static mount as a side effect while
//! behaving as an ordinary web application. The pipeline then serves the app
//! on an ephemeral local port, fetches every discovered route, fingerprints
//! the responses, uploads only what changed to the object store, and issues a
//! single CDN invalidation for the changed paths.
//!
//! # Example
//!
//! ```no_run
//! use stasis::{App, Response, static_files};
//!
//! fn main() -> anyhow::Result<()> {
//!     stasis::cli::run(|app: &mut App| {
//!         app.route("/", |_req| Response::html("<h1>hi</h1>"));
//!         app.mount("/static", static_files("public")?);
//!         Ok(())
//!     })
//! }
//! ```
//!
//! Invoked as `myapp --s3-bucket=my-bucket --cloudfront-distribution-id=E123`.

pub mod app;
pub mod cli;
pub mod config;
mod core;
pub mod diff;
pub mod logger;
pub mod publish;
pub mod remote;
pub mod routes;
pub mod server;
pub mod snapshot;
pub mod utils;

pub use app::{App, Middleware, Request, Response, StaticMount, static_files};
pub use publish::DeploySummary;
pub use snapshot::{FileRecord, Fingerprint};
