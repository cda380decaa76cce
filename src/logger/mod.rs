//! Logger module
//!
//! Thin layer over `tracing`:
//! - Subscriber initialization from configuration
//! - Server lifecycle logging
//! - Access logging with multiple formats

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::ServerError;

/// Target used for access log lines, so they can be filtered independently
pub const ACCESS_TARGET: &str = "access";

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`.
/// Should be called once at application startup.
pub fn init(config: &Config) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(|e| ServerError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Tuna gateway started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    tracing::info!("Max body size: {} bytes", config.http.max_body_size);
    if let Some(max) = config.performance.max_connections {
        tracing::info!("Max connections: {max}");
    }
    tracing::info!("======================================");
}

pub fn log_routes(routes: &[(String, &'static str)]) {
    for (method, pattern) in routes {
        tracing::info!("  - {method:<5} {pattern}");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(%peer_addr, "connection accepted");
}

pub fn log_connection_rejected(current: usize, max: u64) {
    tracing::warn!("Max connections reached: {current}/{max}. Connection rejected.");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_connection_timeout(secs: u64) {
    tracing::warn!("Connection idle for {secs} seconds, closing");
}

pub fn log_request_timeout(secs: u64) {
    tracing::warn!("Request not served within {secs} seconds");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

pub fn log_shutdown_requested(signal: &str) {
    tracing::info!("{signal} received, shutting down");
}

pub fn log_draining(open: usize) {
    tracing::info!("Listener closed; draining {open} open connection(s)");
}

pub fn log_drain_timeout(open: usize) {
    tracing::warn!("Drain timed out with {open} connection(s) still open");
}

pub fn log_shutdown_complete() {
    tracing::info!("Shutdown complete");
}
