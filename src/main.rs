use std::sync::Arc;

use tuna_gateway::config::{Config, DEFAULT_CONFIG_PATH};
use tuna_gateway::handler::{AssetHandler, UnavailableHandler};
use tuna_gateway::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path_from_args(std::env::args().skip(1));
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Size the runtime from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::info!("Using {workers} worker threads");
    } else {
        tracing::info!("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    // No ledger backend is linked into the standalone binary
    let handler: Arc<dyn AssetHandler> = Arc::new(UnavailableHandler);
    runtime.block_on(server::serve(cfg, handler))?;
    Ok(())
}

/// `-c <path>` / `--config <path>`; the path is given without extension
fn config_path_from_args(mut args: impl Iterator<Item = String>) -> String {
    while let Some(arg) = args.next() {
        if arg == "-c" || arg == "--config" {
            if let Some(path) = args.next() {
                return path;
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}
