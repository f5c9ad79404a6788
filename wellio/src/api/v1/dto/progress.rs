//! Progress score DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{BatchProgressResult, ProgressFailure, ProgressScore};

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressScoreResponse {
    pub client_id: String,
    /// Weighted blend of the three components, 0-100.
    pub composite_score: f64,
    pub goal_progress: f64,
    pub weekly_progress: f64,
    pub activity_progress: f64,
    pub active_goals: usize,
    pub events_considered: usize,
    #[schema(value_type = String)]
    pub computed_at: DateTime<Utc>,
}

impl From<ProgressScore> for ProgressScoreResponse {
    fn from(s: ProgressScore) -> Self {
        Self {
            client_id: s.client_id,
            composite_score: s.composite_score,
            goal_progress: s.goal_progress,
            weekly_progress: s.weekly_progress,
            activity_progress: s.activity_progress,
            active_goals: s.active_goals,
            events_considered: s.events_considered,
            computed_at: s.computed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressFailureResponse {
    pub client_id: String,
    pub error: String,
}

impl From<ProgressFailure> for ProgressFailureResponse {
    fn from(f: ProgressFailure) -> Self {
        Self {
            client_id: f.client_id,
            error: f.error,
        }
    }
}

/// Outcome of a batch recalculation. One client failing never stops the
/// others.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgressResponse {
    pub updated: usize,
    pub failed: Vec<ProgressFailureResponse>,
}

impl From<BatchProgressResult> for BatchProgressResponse {
    fn from(r: BatchProgressResult) -> Self {
        Self {
            updated: r.updated,
            failed: r.failed.into_iter().map(Into::into).collect(),
        }
    }
}
