// Configuration module entry point
// Layered loading: built-in defaults, optional config file, then GATEWAY_* environment

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ServerError;

pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig,
    ServerConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// Prefix for environment overrides, e.g. `GATEWAY_HTTP__MAX_BODY_SIZE`
pub const ENV_PREFIX: &str = "GATEWAY";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error; defaults and environment still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from an in-memory TOML document layered over the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.max_body_size", 10_485_760) // 10MB
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| ServerError::Address(format!("{addr}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_file() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.performance.max_connections, None);
        assert!(!cfg.routes.health.enabled);
        assert_eq!(cfg.routes.health.liveness_path, "/healthz");
        assert_eq!(cfg.routes.health.readiness_path, "/readyz");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [server]
            port = 9090
            workers = 2

            [http]
            max_body_size = 1024

            [routes.health]
            enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.http.max_body_size, 1024);
        assert!(cfg.routes.health.enabled);
        // Untouched keys keep their defaults
        assert_eq!(cfg.routes.health.liveness_path, "/healthz");
        assert_eq!(cfg.performance.read_timeout, 30);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::from_toml_str("[server]\nhost = \"0.0.0.0\"\nport = 3000").unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 3000);

        let bad = Config::from_toml_str("[server]\nhost = \"not a host\"").unwrap();
        assert!(matches!(bad.get_socket_addr(), Err(ServerError::Address(_))));
    }
}
