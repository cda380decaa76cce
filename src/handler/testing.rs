//! Recording `AssetHandler` test double.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::{AssetHandler, HandlerResponse};
use crate::http::RequestBody;

/// One observed handler invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetById(String),
    AddItem(RequestBody),
    ListAll,
    ChangeHolder(String),
    UpdateLocation(String),
}

/// Records every call and answers with a fixed response
pub struct RecordingHandler {
    calls: Mutex<Vec<Call>>,
    status: StatusCode,
    body: &'static str,
    delay: Duration,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::responding(StatusCode::OK, "handled")
    }

    pub fn responding(status: StatusCode, body: &'static str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    /// Sleep this long before recording each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: Call) -> HandlerResponse {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.calls.lock().unwrap().push(call);
        Response::builder()
            .status(self.status)
            .header("Content-Type", "text/plain")
            .header("X-Handler", "recording")
            .body(Full::new(Bytes::from_static(self.body.as_bytes())))
            .unwrap()
    }
}

#[async_trait]
impl AssetHandler for RecordingHandler {
    async fn get_by_id(&self, id: &str) -> HandlerResponse {
        self.record(Call::GetById(id.to_string())).await
    }

    async fn add_item(&self, body: RequestBody) -> HandlerResponse {
        self.record(Call::AddItem(body)).await
    }

    async fn list_all(&self) -> HandlerResponse {
        self.record(Call::ListAll).await
    }

    async fn change_holder(&self, holder: &str) -> HandlerResponse {
        self.record(Call::ChangeHolder(holder.to_string())).await
    }

    async fn update_location(&self, location: &str) -> HandlerResponse {
        self.record(Call::UpdateLocation(location.to_string())).await
    }
}
