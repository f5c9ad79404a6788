//! Progress event request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ProgressEvent;
use crate::normalization::ExplicitLog;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/clients/{clientId}/events`.
///
/// Tagged by `logType` (`nutrition`, `workout` or `check_in`), e.g.
/// `{"logType": "workout", "activity": "row", "avgHrBpm": 150}`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct LogEventRequest(pub ExplicitLog);

/// Query parameters for `GET /v1/clients/{clientId}/events`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    /// Only events that occurred at or after this instant (RFC 3339).
    pub since: Option<String>,
    /// Restrict to one event type, e.g. `exercise`.
    pub event_type: Option<String>,
    /// Include events replaced by a smart-log reprocess (default false).
    pub include_superseded: Option<bool>,
    /// Maximum number of events (default 100, max 1000).
    pub limit: Option<u32>,
}

/// Request body for `PATCH /v1/events/{eventId}`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorrectEventRequest {
    /// New event type. Defaults to the current one.
    pub event_type: Option<String>,
    /// Replacement payload for the event type.
    #[schema(value_type = Object)]
    pub data: Value,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub client_id: String,
    /// `nutrition`, `exercise`, `sleep`, `weight`, `mood`, `check_in` or
    /// `unclassified`.
    pub event_type: String,
    #[schema(value_type = Object)]
    pub data: Value,
    /// `explicit`, `smart_log` or `device_sync`.
    pub source: String,
    pub confidence: f64,
    pub needs_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart_log_id: Option<String>,
    pub superseded: bool,
    #[schema(value_type = Option<String>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_at: Option<DateTime<Utc>>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<ProgressEvent> for EventResponse {
    fn from(e: ProgressEvent) -> Self {
        Self {
            event_type: e.event_type().to_string(),
            data: e.data.payload(),
            source: e.source.to_string(),
            id: e.id,
            client_id: e.client_id,
            confidence: e.confidence,
            needs_review: e.needs_review,
            smart_log_id: e.smart_log_id,
            superseded: e.superseded,
            corrected_at: e.corrected_at,
            created_at: e.created_at,
        }
    }
}
