// Application state module
// Shared by every connection task

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};

use super::types::Config;
use crate::handler::Router;

/// Application state
pub struct AppState {
    pub config: Config,
    pub router: Router,
    /// Notified once when the process should stop accepting connections
    pub shutdown: Arc<Notify>,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
    /// Flipped to `true` once the listener is closed
    draining: watch::Sender<bool>,
    /// Permit stored each time a connection task ends
    connection_closed: Notify,
}

impl AppState {
    pub fn new(config: &Config, router: Router) -> Self {
        Self {
            config: config.clone(),
            router,
            shutdown: Arc::new(Notify::new()),
            active_connections: AtomicUsize::new(0),
            draining: watch::Sender::new(false),
            connection_closed: Notify::new(),
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }

    pub fn connection_count(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }

    /// Upper bound for serving one request, `max(read_timeout, write_timeout)`
    pub fn request_timeout(&self) -> Duration {
        let performance = &self.config.performance;
        Duration::from_secs(performance.read_timeout.max(performance.write_timeout))
    }

    /// How long a keep-alive connection may wait for its next request
    ///
    /// `None` when `keep_alive_timeout` is 0, which disables keep-alive.
    pub fn idle_timeout(&self) -> Option<Duration> {
        match self.config.performance.keep_alive_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Receiver that observes the drain flag
    pub fn drain_receiver(&self) -> watch::Receiver<bool> {
        self.draining.subscribe()
    }

    /// Ask every open connection to finish its current request and close
    pub fn begin_drain(&self) {
        self.draining.send_replace(true);
    }

    /// Release the slot held by a finished connection
    pub fn connection_finished(&self) {
        self.active_connections.fetch_sub(1, Ordering::SeqCst);
        self.connection_closed.notify_one();
    }

    /// Wait until no connection is being served
    pub async fn wait_for_idle(&self) {
        while self.connection_count() > 0 {
            self.connection_closed.notified().await;
        }
    }
}
