//! v1 Goal handlers.

use axum::extract::{Path, State};
use axum_extra::extract::Query;
use chrono::Utc;
use nanoid::nanoid;
use serde::Deserialize;

use crate::api::v1::dto::{CreateGoalRequest, GoalResponse, UpdateGoalRequest, V1GoalStatus};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::models::Goal;

/// Query parameters for `GET /v1/clients/{clientId}/goals`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListGoalsQuery {
    /// Only goals with this status.
    pub status: Option<V1GoalStatus>,
}

/// `POST /api/v1/clients/{clientId}/goals`
#[utoipa::path(
    post,
    path = "/api/v1/clients/{clientId}/goals",
    tag = "goals",
    operation_id = "goals.create",
    params(("clientId" = String, Path, description = "Client ID")),
    request_body = CreateGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = GoalResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_goal(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    axum::Json(req): axum::Json<CreateGoalRequest>,
) -> ApiResponse<GoalResponse> {
    if req.goal_type.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "goalType cannot be empty");
    }
    let values = [Some(req.baseline_value), Some(req.target_value), req.current_value];
    if values.iter().flatten().any(|v| !v.is_finite()) {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Goal values must be finite");
    }

    match state.db.get_client(&client_id).await {
        Ok(Some(client)) if client.is_archived() => {
            return ApiResponse::error(
                ErrorCode::InvalidRequest,
                format!("Client {client_id} is archived"),
            )
        }
        Ok(Some(_)) => {}
        Ok(None) => {
            return ApiResponse::error(
                ErrorCode::NotFound,
                format!("Client {client_id} not found"),
            )
        }
        Err(e) => return e.into(),
    }

    let mut goal = Goal::new(
        nanoid!(),
        client_id,
        req.goal_type.trim().to_string(),
        req.baseline_value,
        req.target_value,
    );
    if let Some(current) = req.current_value {
        goal.current_value = current;
    }
    goal.deadline = req.deadline;

    if let Err(e) = state.db.create_goal(&goal).await {
        return e.into();
    }
    state.progress.spawn_update(&goal.client_id);

    ApiResponse::created(GoalResponse::from(goal))
}

/// `GET /api/v1/clients/{clientId}/goals`
#[utoipa::path(
    get,
    path = "/api/v1/clients/{clientId}/goals",
    tag = "goals",
    operation_id = "goals.list",
    params(
        ("clientId" = String, Path, description = "Client ID"),
        ListGoalsQuery,
    ),
    responses(
        (status = 200, description = "Goals", body = Vec<GoalResponse>),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_goals(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Query(query): Query<ListGoalsQuery>,
) -> ApiResponse<Vec<GoalResponse>> {
    match state.db.get_client(&client_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return ApiResponse::error(
                ErrorCode::NotFound,
                format!("Client {client_id} not found"),
            )
        }
        Err(e) => return e.into(),
    }

    match state
        .db
        .list_goals(&client_id, query.status.map(Into::into))
        .await
    {
        Ok(goals) => {
            let total = goals.len();
            let data = goals.into_iter().map(GoalResponse::from).collect();
            ApiResponse::success_with_total(data, total)
        }
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/goals/{goalId}`
#[utoipa::path(
    patch,
    path = "/api/v1/goals/{goalId}",
    tag = "goals",
    operation_id = "goals.update",
    params(("goalId" = String, Path, description = "Goal ID")),
    request_body = UpdateGoalRequest,
    responses(
        (status = 200, description = "Goal updated", body = GoalResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Goal not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Json(req): axum::Json<UpdateGoalRequest>,
) -> ApiResponse<GoalResponse> {
    let mut goal = match state.db.get_goal(&id).await {
        Ok(Some(goal)) => goal,
        Ok(None) => return ApiResponse::error(ErrorCode::NotFound, format!("Goal {id} not found")),
        Err(e) => return e.into(),
    };

    if [req.current_value, req.target_value]
        .iter()
        .flatten()
        .any(|v| !v.is_finite())
    {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Goal values must be finite");
    }

    if let Some(current) = req.current_value {
        goal.current_value = current;
    }
    if let Some(target) = req.target_value {
        goal.target_value = target;
    }
    if let Some(status) = req.status {
        goal.status = status.into();
    }
    if req.deadline.is_some() {
        goal.deadline = req.deadline;
    }
    goal.updated_at = Utc::now();

    if let Err(e) = state.db.update_goal(&goal).await {
        return e.into();
    }
    state.progress.spawn_update(&goal.client_id);

    ApiResponse::success(GoalResponse::from(goal))
}
