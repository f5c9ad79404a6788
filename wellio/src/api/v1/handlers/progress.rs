//! v1 Progress score handlers.

use axum::extract::{Path, State};

use crate::api::v1::dto::ProgressScoreResponse;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;

/// `GET /api/v1/clients/{clientId}/progress`
///
/// Computes the score without persisting it.
#[utoipa::path(
    get,
    path = "/api/v1/clients/{clientId}/progress",
    tag = "progress",
    operation_id = "progress.compute",
    params(("clientId" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Current progress score", body = ProgressScoreResponse),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn compute_progress(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> ApiResponse<ProgressScoreResponse> {
    match state.progress.compute(&client_id).await {
        Ok(score) => ApiResponse::success(ProgressScoreResponse::from(score)),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/clients/{clientId}/progress`
///
/// Recomputes and stores the score on the client.
#[utoipa::path(
    post,
    path = "/api/v1/clients/{clientId}/progress",
    tag = "progress",
    operation_id = "progress.update",
    params(("clientId" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Progress score persisted", body = ProgressScoreResponse),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_progress(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> ApiResponse<ProgressScoreResponse> {
    match state.progress.update_one(&client_id).await {
        Ok(score) => ApiResponse::success(ProgressScoreResponse::from(score)),
        Err(e) => e.into(),
    }
}
