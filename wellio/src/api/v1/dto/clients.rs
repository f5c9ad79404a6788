//! Client request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, Client, Sex};

/// Request body for `POST /v1/clients`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    /// Coach who owns the client.
    pub coach_id: String,
    pub name: String,
    pub email: Option<String>,
    /// `female`, `male` or `other`.
    #[schema(value_type = Option<String>)]
    pub sex: Option<Sex>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    /// `sedentary`, `light`, `moderate`, `active` or `very_active`.
    #[schema(value_type = Option<String>)]
    pub activity_level: Option<ActivityLevel>,
    pub goal_type: Option<String>,
    pub goal_description: Option<String>,
}

/// Request body for `PATCH /v1/clients/{clientId}`. Absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[schema(value_type = Option<String>)]
    pub sex: Option<Sex>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    #[schema(value_type = Option<String>)]
    pub activity_level: Option<ActivityLevel>,
    pub goal_type: Option<String>,
    pub goal_description: Option<String>,
}

/// Query parameters for `GET /v1/clients`.
#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListClientsQuery {
    /// Only clients of this coach.
    pub coach_id: Option<String>,
    /// Include archived clients (default false).
    pub include_archived: Option<bool>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub id: String,
    pub coach_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[schema(value_type = Option<String>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[schema(value_type = Option<String>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_description: Option<String>,
    /// Last persisted composite progress score, 0-100.
    pub progress_score: Option<f64>,
    #[schema(value_type = Option<String>)]
    pub progress_updated_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>)]
    pub archived_at: Option<DateTime<Utc>>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            coach_id: c.coach_id,
            name: c.name,
            email: c.email,
            sex: c.sex,
            age: c.age,
            weight_kg: c.weight_kg,
            height_cm: c.height_cm,
            activity_level: c.activity_level,
            goal_type: c.goal_type,
            goal_description: c.goal_description,
            progress_score: c.progress_score,
            progress_updated_at: c.progress_updated_at,
            archived_at: c.archived_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_snake_case_enums() {
        let req: CreateClientRequest = serde_json::from_value(serde_json::json!({
            "coachId": "coach-1",
            "name": "Dana",
            "sex": "female",
            "activityLevel": "very_active",
            "weightKg": 64.5
        }))
        .unwrap();
        assert_eq!(req.sex, Some(Sex::Female));
        assert_eq!(req.activity_level, Some(ActivityLevel::VeryActive));
        assert_eq!(req.weight_kg, Some(64.5));
    }

    #[test]
    fn response_serializes_camel_case() {
        let client = Client::new("c1".into(), "coach-1".into(), "Dana".into());
        let json = serde_json::to_value(ClientResponse::from(client)).unwrap();
        assert_eq!(json["coachId"], "coach-1");
        assert!(json["progressScore"].is_null());
        assert!(json.get("email").is_none());
    }
}
