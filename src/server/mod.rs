//! HTTP serving: the ephemeral snapshot server and the host's `listen` mode.
//!
//! Both paths share one request loop; the ephemeral server binds an
//! OS-assigned loopback port and guarantees teardown on every exit path via
//! a drop guard.

use crate::app::{App, Request, Response};
use crate::{core, debug, log};
use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Server, StatusCode};

/// Maximum number of port binding attempts for `listen` mode.
const MAX_PORT_RETRIES: u16 = 10;

/// Request-handling worker threads per server.
const WORKER_THREADS: usize = 4;

/// Ephemeral server guard.
///
/// `start` binds an OS-assigned port on loopback and serves the app in the
/// background; `shutdown` (or drop) unblocks the accept loop and joins it.
pub struct EphemeralServer {
    base_url: String,
    server: Arc<Server>,
    accept: Option<JoinHandle<()>>,
}

impl EphemeralServer {
    /// Bind to `127.0.0.1:0` and start serving `app`.
    pub fn start(app: App) -> Result<Self> {
        let server = Server::http(("127.0.0.1", 0))
            .map_err(|e| anyhow::anyhow!("failed to bind ephemeral server: {e}"))?;
        let addr = server
            .server_addr()
            .to_ip()
            .context("ephemeral server bound to a non-IP address")?;
        let server = Arc::new(server);
        core::register_server(Arc::clone(&server));

        let base_url = format!("http://{addr}");
        debug!("serve"; "ephemeral server on {base_url}");

        let app = Arc::new(app);
        let accept = {
            let server = Arc::clone(&server);
            thread::spawn(move || run_request_loop(&server, &app))
        };

        Ok(Self {
            base_url,
            server,
            accept: Some(accept),
        })
    }

    /// Loopback base URL, e.g. `http://127.0.0.1:49152`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop accepting requests and wait for in-flight ones to finish.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        let Some(accept) = self.accept.take() else {
            return;
        };
        self.server.unblock();
        let _ = accept.join();
    }
}

impl Drop for EphemeralServer {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

/// Serve `app` on a fixed interface/port until Ctrl+C (the host's normal
/// run mode).
pub fn serve_blocking(app: App, interface: IpAddr, port: u16) -> Result<()> {
    let (server, addr) = bind_with_retry(interface, port)?;
    let server = Arc::new(server);
    core::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);

    let app = Arc::new(app);
    run_request_loop(&server, &app);
    Ok(())
}

/// Bind to the specified interface and port, with automatic port retry.
fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

fn run_request_loop(server: &Server, app: &Arc<App>) {
    // Thread pool so one slow handler does not block the other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKER_THREADS)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        if core::is_shutdown() {
            break;
        }
        let app = Arc::clone(app);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &app) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    // Pool drop waits for in-flight handlers before the caller proceeds
}

/// Handle a single HTTP request.
fn handle_request(request: tiny_http::Request, app: &App) -> Result<()> {
    let req = to_request(&request);
    let head_only = req.method() == "HEAD";
    let response = app.handle(&req);
    respond(request, response, head_only)
}

/// Convert a wire request into the handler-facing view.
fn to_request(request: &tiny_http::Request) -> Request {
    let raw = request.url();
    let path = raw.split('?').next().unwrap_or(raw);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string());
    Request::new(request.method().as_str(), decoded)
}

/// Send a handler response over the wire.
fn respond(request: tiny_http::Request, response: Response, head_only: bool) -> Result<()> {
    let body = if head_only {
        Vec::new()
    } else {
        response.body().to_vec()
    };
    let mut http =
        tiny_http::Response::from_data(body).with_status_code(StatusCode(response.status()));

    if let Some(ct) = response.content_type()
        && let Ok(header) = Header::from_bytes("Content-Type", ct.as_bytes())
    {
        http.add_header(header);
    }
    if let Some(cc) = response.cache_control()
        && let Ok(header) = Header::from_bytes("Cache-Control", cc.as_bytes())
    {
        http.add_header(header);
    }
    for (name, value) in response.extra_headers() {
        if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            http.add_header(header);
        }
    }

    request.respond(http)?;
    Ok(())
}
