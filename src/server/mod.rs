// Server module entry
// Listener setup, connection serving and shutdown handling

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;
pub use signal::start_signal_handler;

use std::sync::Arc;

use crate::config::{AppState, Config};
use crate::error::ServerError;
use crate::handler::{AssetHandler, Router, RouterConfig};
use crate::logger;
use crate::routing;

/// Bind the configured address and serve `handler` until SIGINT/SIGTERM
///
/// Requests already in flight when the signal arrives are answered before
/// this returns. Must be called from within a tokio runtime.
pub async fn serve(config: Config, handler: Arc<dyn AssetHandler>) -> Result<(), ServerError> {
    let addr = config.get_socket_addr()?;
    let listener = create_reusable_listener(addr)?;

    let router = Router::new(handler, RouterConfig::from_config(&config));
    let state = Arc::new(AppState::new(&config, router));

    logger::log_server_start(&addr, &config);
    logger::log_routes(&routing::route_table());

    start_signal_handler(Arc::clone(&state.shutdown))?;

    // Local tasks so handlers and bodies need not be Send
    let local = tokio::task::LocalSet::new();
    local.run_until(start_server_loop(listener, state)).await;
    Ok(())
}
