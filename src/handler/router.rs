//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: health probes, body-size
//! enforcement, route resolution, and delegation to the `AssetHandler`.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};

use super::{AssetHandler, HandlerResponse};
use crate::config::{Config, HealthConfig};
use crate::http::{self, body};
use crate::logger;
use crate::routing::{self, Operation, Resolution, RouteMatch};

/// Settings the router needs from the full configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Upper bound for request bodies, in bytes
    pub max_body_size: u64,
    pub health: HealthConfig,
}

impl RouterConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_body_size: config.http.max_body_size,
            health: config.routes.health.clone(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10_485_760,
            health: HealthConfig::default(),
        }
    }
}

/// Binds the route table to an injected handler
#[derive(Clone)]
pub struct Router {
    handler: Arc<dyn AssetHandler>,
    config: Arc<RouterConfig>,
}

impl Router {
    pub fn new(handler: Arc<dyn AssetHandler>, config: RouterConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }

    /// Handle one request
    ///
    /// Generic over the body so it can be driven by hyper's `Incoming` as
    /// well as in-memory bodies.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let is_head = req.method() == Method::HEAD;

        // 1. Health check endpoints
        if let Some(resp) = self.check_health(req.method(), req.uri().path()) {
            return resp;
        }

        // 2. Declared body size
        if let Some(resp) = self.check_body_size(&req) {
            return resp;
        }

        // 3. Route resolution
        let matched = match routing::resolve(req.method(), req.uri().path()) {
            Resolution::Matched(matched) => matched,
            Resolution::NotFound => {
                logger::log_warning(&format!(
                    "No route for {} {}",
                    req.method(),
                    req.uri().path()
                ));
                return http::build_404_response();
            }
            Resolution::InvalidParam(detail) => {
                return http::error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Invalid path parameter {detail}"),
                );
            }
        };

        // 4. Dispatch
        let resp = self.dispatch(matched, req).await;
        if is_head {
            http::strip_body(resp)
        } else {
            resp
        }
    }

    fn check_health(&self, method: &Method, path: &str) -> Option<Response<Full<Bytes>>> {
        let health = &self.config.health;
        if !health.enabled || (method != Method::GET && method != Method::HEAD) {
            return None;
        }
        // Readiness can include backend checks in the future
        if path == health.liveness_path || path == health.readiness_path {
            return Some(http::build_health_response("ok"));
        }
        None
    }

    /// Reject on Content-Length before anything is read
    fn check_body_size<B>(&self, req: &Request<B>) -> Option<Response<Full<Bytes>>> {
        let size = body::declared_length(req.headers())?;
        let max_body_size = self.config.max_body_size;
        if size > max_body_size {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            return Some(http::build_413_response(max_body_size));
        }
        None
    }

    async fn dispatch<B>(&self, matched: RouteMatch, req: Request<B>) -> HandlerResponse
    where
        B: Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let param = |name: &str| matched.param(name).unwrap_or_default().to_string();

        match matched.operation {
            Operation::GetById => self.handler.get_by_id(&param("id")).await,
            Operation::ListAll => self.handler.list_all().await,
            Operation::ChangeHolder => self.handler.change_holder(&param("holder")).await,
            Operation::UpdateLocation => {
                self.handler.update_location(&param("location")).await
            }
            Operation::AddItem => {
                let (parts, incoming) = req.into_parts();
                match body::read_body(&parts.headers, incoming, self.config.max_body_size).await {
                    Ok(parsed) => self.handler.add_item(parsed).await,
                    Err(e) => {
                        logger::log_warning(&format!("Rejected {} body: {e}", Operation::AddItem));
                        http::error_response(e.status(), &e.to_string())
                    }
                }
            }
        }
    }
}
