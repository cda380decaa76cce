//! HTTP protocol layer module
//!
//! Request body parsing and the responses the gateway builds itself,
//! decoupled from the route table and the handler.

pub mod body;
pub mod response;

// Re-export commonly used types
pub use body::RequestBody;
pub use response::{
    build_404_response, build_413_response, build_503_response, build_health_response,
    error_response, json_response, strip_body,
};
