//! Admin DTOs for the v1 API.

use serde::Deserialize;

/// Query parameters for `POST /v1/admin/progress:recalculate`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateProgressQuery {
    /// Only recalculate this coach's clients. All active clients otherwise.
    pub coach_id: Option<String>,
}

