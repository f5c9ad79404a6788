//! v1 Smart log handlers.
//!
//! Creation and reprocessing return `202 Accepted`; classification runs in
//! the background and its outcome is visible through `GET`.

use axum::extract::{Path, State};
use axum_extra::extract::Query;

use crate::api::v1::dto::{CreateSmartLogRequest, ListSmartLogsQuery, SmartLogResponse};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;

const DEFAULT_SMART_LOG_LIMIT: u32 = 50;
const MAX_SMART_LOG_LIMIT: u32 = 500;

/// `POST /api/v1/clients/{clientId}/smart-logs`
#[utoipa::path(
    post,
    path = "/api/v1/clients/{clientId}/smart-logs",
    tag = "smart-logs",
    operation_id = "smartLogs.create",
    params(("clientId" = String, Path, description = "Client ID")),
    request_body = CreateSmartLogRequest,
    responses(
        (status = 202, description = "Smart log accepted for processing", body = SmartLogResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_smart_log(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    axum::Json(req): axum::Json<CreateSmartLogRequest>,
) -> ApiResponse<SmartLogResponse> {
    if req.media_urls.iter().any(|u| url::Url::parse(u).is_err()) {
        return ApiResponse::error(ErrorCode::InvalidRequest, "mediaUrls must be absolute URLs");
    }

    match state.smart_logs.create(&client_id, req.into()).await {
        Ok(log) => ApiResponse::accepted(SmartLogResponse::from(log)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/clients/{clientId}/smart-logs`
#[utoipa::path(
    get,
    path = "/api/v1/clients/{clientId}/smart-logs",
    tag = "smart-logs",
    operation_id = "smartLogs.list",
    params(
        ("clientId" = String, Path, description = "Client ID"),
        ListSmartLogsQuery,
    ),
    responses(
        (status = 200, description = "Smart logs, newest first", body = Vec<SmartLogResponse>),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_smart_logs(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Query(query): Query<ListSmartLogsQuery>,
) -> ApiResponse<Vec<SmartLogResponse>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SMART_LOG_LIMIT)
        .clamp(1, MAX_SMART_LOG_LIMIT);

    match state.smart_logs.list(&client_id, limit).await {
        Ok(logs) => {
            let total = logs.len();
            let data = logs.into_iter().map(SmartLogResponse::from).collect();
            ApiResponse::success_with_total(data, total)
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/smart-logs/{smartLogId}`
#[utoipa::path(
    get,
    path = "/api/v1/smart-logs/{smartLogId}",
    tag = "smart-logs",
    operation_id = "smartLogs.get",
    params(("smartLogId" = String, Path, description = "Smart log ID")),
    responses(
        (status = 200, description = "Smart log found", body = SmartLogResponse),
        (status = 404, description = "Smart log not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_smart_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<SmartLogResponse> {
    match state.smart_logs.get(&id).await {
        Ok(log) => ApiResponse::success(SmartLogResponse::from(log)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/smart-logs/{smartLogId}/reprocess`
///
/// Events from earlier attempts are superseded once the new attempt
/// succeeds.
#[utoipa::path(
    post,
    path = "/api/v1/smart-logs/{smartLogId}/reprocess",
    tag = "smart-logs",
    operation_id = "smartLogs.reprocess",
    params(("smartLogId" = String, Path, description = "Smart log ID")),
    responses(
        (status = 202, description = "Reprocess scheduled", body = SmartLogResponse),
        (status = 404, description = "Smart log not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn reprocess_smart_log(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<SmartLogResponse> {
    match state.smart_logs.reprocess(&id).await {
        Ok(log) => ApiResponse::accepted(SmartLogResponse::from(log)),
        Err(e) => e.into(),
    }
}
