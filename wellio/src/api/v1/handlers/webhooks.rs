//! v1 Wearables webhook handler.

use axum::extract::{Path, State};
use serde_json::Value;

use crate::api::v1::dto::EventResponse;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;

/// Webhook body as sent by the wearables aggregator:
/// `{"type": "activity", "user": {"reference_id": "<clientId>"}, "data": [...]}`.
#[derive(Debug, Clone, serde::Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct DeviceWebhookPayload(pub Value);

/// `POST /api/v1/webhooks/{provider}`
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/{provider}",
    tag = "webhooks",
    operation_id = "webhooks.ingest",
    params(("provider" = String, Path, description = "Device data provider, e.g. terra")),
    request_body = DeviceWebhookPayload,
    responses(
        (status = 200, description = "Events ingested", body = Vec<EventResponse>),
        (status = 400, description = "Invalid payload", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn ingest_webhook(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    axum::Json(payload): axum::Json<DeviceWebhookPayload>,
) -> ApiResponse<Vec<EventResponse>> {
    let provider = provider.trim().to_lowercase();
    if provider.is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Provider cannot be empty");
    }
    if !payload.0.is_object() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Payload must be a JSON object");
    }

    match state.events.ingest_device_sync(&provider, payload.0).await {
        Ok(events) => {
            let total = events.len();
            let data = events.into_iter().map(EventResponse::from).collect();
            ApiResponse::success_with_total(data, total)
        }
        Err(e) => e.into(),
    }
}
