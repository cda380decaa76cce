//! Request handler module
//!
//! The `AssetHandler` capability set the router delegates to, the router
//! itself, and the placeholder backend used when no ledger is wired in.

pub mod router;
mod unavailable;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::http::RequestBody;

pub use router::{Router, RouterConfig};
pub use unavailable::UnavailableHandler;

/// Response produced by a handler; passed to the client unmodified
pub type HandlerResponse = Response<Full<Bytes>>;

/// External component implementing the five asset operations
///
/// The handler owns the status code of every routed response, including
/// failures; the router never translates them.
#[async_trait]
pub trait AssetHandler: Send + Sync {
    /// `GET /get_tuna/:id`
    async fn get_by_id(&self, id: &str) -> HandlerResponse;

    /// `POST /add_tuna`
    async fn add_item(&self, body: RequestBody) -> HandlerResponse;

    /// `GET /get_all_tuna`
    async fn list_all(&self) -> HandlerResponse;

    /// `GET /change_holder/:holder`
    async fn change_holder(&self, holder: &str) -> HandlerResponse;

    /// `GET /update_location/:location`
    async fn update_location(&self, location: &str) -> HandlerResponse;
}
