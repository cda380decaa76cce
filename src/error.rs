//! Error types for request body handling and server startup.

use hyper::StatusCode;
use thiserror::Error;

/// Failure while collecting or decoding a request body.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The body exceeded the configured size limit.
    #[error("request body exceeds limit of {limit} bytes")]
    TooLarge { limit: u64 },
    /// The route requires a body but none was sent.
    #[error("request body is required")]
    Missing,
    /// The transport failed while streaming the body.
    #[error("failed to read request body: {0}")]
    Read(String),
    /// Neither JSON nor URL-encoded.
    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// Strict JSON only accepts an object or array at the top level.
    #[error("JSON body must be an object or array")]
    NotStructured,
}

impl BodyError {
    /// Client-error status the body parser answers with.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Missing | Self::Read(_) | Self::InvalidJson(_) | Self::NotStructured => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

/// Failure while bringing the server up.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid listen address {0}")]
    Address(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
