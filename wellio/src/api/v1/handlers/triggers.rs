//! v1 Engagement trigger handlers.

use axum::extract::{Path, State};
use axum_extra::extract::Query;

use crate::api::v1::dto::{ListTriggersQuery, ResolveTriggerRequest, TriggerResponse};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;

/// `GET /api/v1/clients/{clientId}/triggers`
#[utoipa::path(
    get,
    path = "/api/v1/clients/{clientId}/triggers",
    tag = "triggers",
    operation_id = "triggers.list",
    params(
        ("clientId" = String, Path, description = "Client ID"),
        ListTriggersQuery,
    ),
    responses(
        (status = 200, description = "Triggers, newest first", body = Vec<TriggerResponse>),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_triggers(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Query(query): Query<ListTriggersQuery>,
) -> ApiResponse<Vec<TriggerResponse>> {
    match state
        .engagement
        .list(&client_id, query.include_resolved.unwrap_or(false))
        .await
    {
        Ok(triggers) => {
            let total = triggers.len();
            let data = triggers.into_iter().map(TriggerResponse::from).collect();
            ApiResponse::success_with_total(data, total)
        }
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/clients/{clientId}/triggers:evaluate`
///
/// Returns only the triggers opened by this evaluation.
#[utoipa::path(
    post,
    path = "/api/v1/clients/{clientId}/triggers:evaluate",
    tag = "triggers",
    operation_id = "triggers.evaluate",
    params(("clientId" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Newly opened triggers", body = Vec<TriggerResponse>),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn evaluate_triggers(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> ApiResponse<Vec<TriggerResponse>> {
    match state.engagement.evaluate(&client_id).await {
        Ok(triggers) => {
            let total = triggers.len();
            let data = triggers.into_iter().map(TriggerResponse::from).collect();
            ApiResponse::success_with_total(data, total)
        }
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/triggers/{triggerId}/resolve`
#[utoipa::path(
    post,
    path = "/api/v1/triggers/{triggerId}/resolve",
    tag = "triggers",
    operation_id = "triggers.resolve",
    params(("triggerId" = String, Path, description = "Trigger ID")),
    request_body = ResolveTriggerRequest,
    responses(
        (status = 200, description = "Trigger resolved", body = TriggerResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Trigger not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn resolve_trigger(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Json(req): axum::Json<ResolveTriggerRequest>,
) -> ApiResponse<TriggerResponse> {
    match state.engagement.resolve(&id, &req.resolved_by).await {
        Ok(trigger) => ApiResponse::success(TriggerResponse::from(trigger)),
        Err(e) => e.into(),
    }
}
