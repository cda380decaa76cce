//! HTTP routing gateway for the tuna asset ledger.
//!
//! Binds five REST routes to an injected [`handler::AssetHandler`], parses
//! JSON and URL-encoded request bodies under a size limit, and passes the
//! handler's responses through untouched.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use config::Config;
pub use error::{BodyError, ServerError};
pub use handler::{AssetHandler, HandlerResponse, Router, RouterConfig, UnavailableHandler};
pub use http::RequestBody;
pub use routing::Operation;
