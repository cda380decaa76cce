// Connection handling module
// Accepts a single TCP connection and serves it with the router

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Accept and process a connection, enforcing the connection limit.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
///
/// Returns `false` when the connection was rejected.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) -> bool {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_connection_rejected(prev_count, max_conn);
            drop(stream);
            return false;
        }
    }

    if state.access_log_enabled() {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, peer_addr, Arc::clone(state));
    true
}

/// Handle a single connection in a spawned local task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 keep-alive and the idle timeout
/// 3. Serves the connection with the router
/// 4. Lets the current request finish once draining starts
/// 5. Releases the connection slot when done
fn handle_connection(stream: tokio::net::TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    let mut draining = state.drain_receiver();

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.timer(TokioTimer::new());
        // Bounds the wait for request headers, including idle keep-alive time
        match state.idle_timeout() {
            Some(idle) => {
                builder.keep_alive(true).header_read_timeout(idle);
            }
            None => {
                builder.keep_alive(false).header_read_timeout(state.request_timeout());
            }
        }

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { Ok::<_, Infallible>(serve_request(req, &state, peer_addr).await) }
            }),
        );
        tokio::pin!(conn);

        let mut shutting_down = false;
        let result = loop {
            tokio::select! {
                res = conn.as_mut() => break res,
                _ = draining.wait_for(|draining| *draining), if !shutting_down => {
                    shutting_down = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        };

        match result {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                logger::log_connection_timeout(state.idle_timeout().unwrap_or_default().as_secs());
            }
            Err(err) => logger::log_connection_error(&err),
        }

        state.connection_finished();
    });
}

/// Route one request under the request timeout
async fn route<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = state.request_timeout();
    match tokio::time::timeout(limit, state.router.handle(req)).await {
        Ok(resp) => resp,
        Err(_) => {
            logger::log_request_timeout(limit.as_secs());
            http::error_response(StatusCode::REQUEST_TIMEOUT, "Request timed out")
        }
    }
}

/// Route one request and write its access log line
pub async fn serve_request<B>(
    req: Request<B>,
    state: &AppState,
    peer_addr: SocketAddr,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if !state.access_log_enabled() {
        return route(req, state).await;
    }

    let started = Instant::now();
    let mut entry = AccessLogEntry::from_request(peer_addr.ip().to_string(), &req);

    let resp = route(req, state).await;

    entry.status = resp.status().as_u16();
    entry.body_bytes = resp
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, &state.config.logging.access_log_format);

    resp
}
