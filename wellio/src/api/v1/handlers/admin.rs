//! v1 Admin handlers.

use axum::extract::State;
use axum_extra::extract::Query;

use crate::api::v1::dto::{BatchProgressResponse, RecalculateProgressQuery};
use crate::api::v1::response::ApiResponse;
use crate::api::AppState;

/// `POST /api/v1/admin/progress:recalculate`
///
/// Recalculates every active client (or one coach's clients). Failures are
/// collected per client instead of aborting the batch.
#[utoipa::path(
    post,
    path = "/api/v1/admin/progress:recalculate",
    tag = "admin",
    operation_id = "admin.recalculateProgress",
    params(RecalculateProgressQuery),
    responses(
        (status = 200, description = "Batch recalculation finished", body = BatchProgressResponse),
    ),
    security(("bearer_auth" = []))
)]
pub async fn recalculate_progress(
    State(state): State<AppState>,
    Query(query): Query<RecalculateProgressQuery>,
) -> ApiResponse<BatchProgressResponse> {
    match state.progress.update_all(query.coach_id.as_deref()).await {
        Ok(result) => ApiResponse::success(BatchProgressResponse::from(result)),
        Err(e) => e.into(),
    }
}
