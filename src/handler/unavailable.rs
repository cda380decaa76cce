use async_trait::async_trait;

use super::{AssetHandler, HandlerResponse};
use crate::http::{build_503_response, RequestBody};
use crate::routing::Operation;

/// Backend used by the standalone binary: every operation answers 503
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableHandler;

#[async_trait]
impl AssetHandler for UnavailableHandler {
    async fn get_by_id(&self, _id: &str) -> HandlerResponse {
        build_503_response(Operation::GetById.name())
    }

    async fn add_item(&self, _body: RequestBody) -> HandlerResponse {
        build_503_response(Operation::AddItem.name())
    }

    async fn list_all(&self) -> HandlerResponse {
        build_503_response(Operation::ListAll.name())
    }

    async fn change_holder(&self, _holder: &str) -> HandlerResponse {
        build_503_response(Operation::ChangeHolder.name())
    }

    async fn update_location(&self, _location: &str) -> HandlerResponse {
        build_503_response(Operation::UpdateLocation.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[tokio::test]
    async fn test_every_operation_is_unavailable() {
        let handler = UnavailableHandler;
        assert_eq!(handler.get_by_id("1").await.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            handler
                .add_item(RequestBody::Json(serde_json::json!({})))
                .await
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(handler.list_all().await.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            handler.change_holder("x").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            handler.update_location("x").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
