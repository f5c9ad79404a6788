//! Smart log request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::V1AuthorType;
use crate::models::SmartLog;
use crate::services::NewSmartLog;

/// Request body for `POST /v1/clients/{clientId}/smart-logs`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSmartLogRequest {
    /// Defaults to `client`.
    pub author_type: Option<V1AuthorType>,
    /// Free text as typed or transcribed.
    pub raw_text: Option<String>,
    /// Photo or voice note URLs attached to the log.
    #[serde(default)]
    pub media_urls: Vec<String>,
}

impl From<CreateSmartLogRequest> for NewSmartLog {
    fn from(req: CreateSmartLogRequest) -> Self {
        Self {
            author_type: req.author_type.map(Into::into).unwrap_or_default(),
            raw_text: req.raw_text,
            media_urls: req.media_urls,
        }
    }
}

/// Query parameters for `GET /v1/clients/{clientId}/smart-logs`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListSmartLogsQuery {
    /// Maximum number of logs, newest first (default 50, max 500).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SmartLogResponse {
    pub id: String,
    pub client_id: String,
    pub author_type: V1AuthorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    pub media_urls: Vec<String>,
    /// `pending`, `processed`, `empty` or `failed`.
    pub status: String,
    #[schema(value_type = Option<String>)]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub attempts: u32,
    /// Every event produced by this log, superseded ones included.
    pub resulting_event_ids: Vec<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<SmartLog> for SmartLogResponse {
    fn from(log: SmartLog) -> Self {
        Self {
            status: log.status.to_string(),
            author_type: log.author_type.into(),
            id: log.id,
            client_id: log.client_id,
            raw_text: log.raw_text,
            media_urls: log.media_urls,
            processed_at: log.processed_at,
            last_error: log.last_error,
            attempts: log.attempts,
            resulting_event_ids: log.resulting_event_ids,
            created_at: log.created_at,
            updated_at: log.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorType;

    #[test]
    fn create_request_defaults_to_client_author() {
        let req: CreateSmartLogRequest =
            serde_json::from_value(serde_json::json!({"rawText": "ran 5k"})).unwrap();
        let input: NewSmartLog = req.into();
        assert_eq!(input.author_type, AuthorType::Client);
        assert!(input.media_urls.is_empty());
        assert_eq!(input.raw_text.as_deref(), Some("ran 5k"));
    }
}
