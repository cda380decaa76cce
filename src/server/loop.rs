// Server loop module
// Accepts connections until the shutdown signal fires

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop
///
/// Must run inside a `LocalSet`; each connection is a local task.
/// Once `state.shutdown` is notified the listener is closed and open
/// connections are drained: each finishes its current request and closes.
/// Returns when all are gone or after the request timeout, whichever is first.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = state.shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    logger::log_draining(state.connection_count());
    state.begin_drain();

    if tokio::time::timeout(state.request_timeout(), state.wait_for_idle())
        .await
        .is_err()
    {
        logger::log_drain_timeout(state.connection_count());
    }
    logger::log_shutdown_complete();
}
