use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Push Dispatch API",
        version = "1.0.0",
        description = "Fans push notifications out to FCM and Huawei Push Kit"
    ),
    paths(
        super::health::root,
        super::health::health,
        super::notifications::send_push_notification,
    ),
    components(schemas(
        crate::models::requests::NotificationRequest,
        crate::models::requests::TokenEntry,
        crate::models::responses::DispatchResponse,
        crate::models::responses::ProviderResult,
        crate::models::responses::HealthResponse,
        crate::models::responses::ServiceHealth,
        crate::models::entities::Provider,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Health", description = "Health and status endpoints"),
        (name = "Push", description = "Push notification dispatch"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
