//! Engagement trigger DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::EngagementTrigger;

/// Query parameters for `GET /v1/clients/{clientId}/triggers`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListTriggersQuery {
    /// Include resolved triggers (default false).
    pub include_resolved: Option<bool>,
}

/// Request body for `POST /v1/triggers/{triggerId}/resolve`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveTriggerRequest {
    /// Coach resolving the trigger.
    pub resolved_by: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub id: String,
    pub client_id: String,
    /// `inactivity` or `missed_workout`.
    pub trigger_type: String,
    /// `low`, `medium` or `high`.
    pub severity: String,
    pub reason: String,
    pub recommended_action: String,
    #[schema(value_type = Option<String>)]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<EngagementTrigger> for TriggerResponse {
    fn from(t: EngagementTrigger) -> Self {
        Self {
            trigger_type: t.trigger_type.to_string(),
            severity: t.severity.to_string(),
            id: t.id,
            client_id: t.client_id,
            reason: t.reason,
            recommended_action: t.recommended_action,
            resolved_at: t.resolved_at,
            resolved_by: t.resolved_by,
            created_at: t.created_at,
        }
    }
}
