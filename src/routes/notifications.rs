use std::sync::Arc;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::AppState;
use crate::error::AppError;
use crate::models::requests::NotificationRequest;
use crate::models::responses::DispatchResponse;

#[utoipa::path(
    post,
    path = "/send-push-notification",
    request_body = NotificationRequest,
    responses(
        (status = 200, body = DispatchResponse, description = "Dispatch attempted; see per-provider results"),
        (status = 400, body = crate::error::ErrorBody, description = "Malformed body or no tokens"),
    ),
    tag = "Push"
)]
pub async fn send_push_notification(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DispatchResponse>, AppError> {
    // Decode before touching secrets or providers.
    let request = NotificationRequest::decode(&body)?;

    tracing::info!(
        token_count = request.tokens.len(),
        has_data = request.data.is_some(),
        "Dispatching push notification"
    );

    let response = state.dispatcher.dispatch(&request).await;
    Ok(Json(response))
}

/// Preflight requests are answered by the CORS layer with an empty body;
/// this wraps it so clients get `ok` alongside the CORS headers.
pub async fn preflight(request: Request, next: Next) -> Response {
    let is_preflight = request.method() == Method::OPTIONS;
    let response = next.run(request).await;
    if !is_preflight {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    Response::from_parts(parts, Body::from("ok"))
}
