//! Goal request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::V1GoalStatus;
use crate::models::Goal;

/// Request body for `POST /v1/clients/{clientId}/goals`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    /// Free-form goal category, e.g. `weight_loss` or `steps`.
    pub goal_type: String,
    /// Value at the start of the goal.
    pub baseline_value: f64,
    pub target_value: f64,
    /// Defaults to the baseline.
    pub current_value: Option<f64>,
    #[schema(value_type = Option<String>)]
    pub deadline: Option<DateTime<Utc>>,
}

/// Request body for `PATCH /v1/goals/{goalId}`. Absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    pub current_value: Option<f64>,
    pub target_value: Option<f64>,
    pub status: Option<V1GoalStatus>,
    #[schema(value_type = Option<String>)]
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalResponse {
    pub id: String,
    pub client_id: String,
    pub goal_type: String,
    pub baseline_value: f64,
    pub target_value: f64,
    pub current_value: f64,
    /// Completion towards the target, 0-100.
    pub completion_percent: f64,
    #[schema(value_type = Option<String>)]
    pub deadline: Option<DateTime<Utc>>,
    pub status: V1GoalStatus,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<Goal> for GoalResponse {
    fn from(g: Goal) -> Self {
        let completion_percent = g.completion_percent();
        Self {
            id: g.id,
            client_id: g.client_id,
            goal_type: g.goal_type,
            baseline_value: g.baseline_value,
            target_value: g.target_value,
            current_value: g.current_value,
            completion_percent,
            deadline: g.deadline,
            status: g.status.into(),
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}
