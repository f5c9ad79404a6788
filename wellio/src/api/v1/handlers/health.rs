use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::v1::response::ApiResponse;
use crate::llm::LlmBackend;

/// Health data returned inside the v1 envelope. `status` is `degraded` when
/// the database does not answer.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub database: DatabaseStatus,
    pub classifier: ClassifierStatus,
    pub background: BackgroundStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DatabaseStatus {
    pub status: String,
}

/// Smart-log classification readiness.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierStatus {
    /// `available` or `unavailable`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub review_threshold: f64,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundStatus {
    pub progress_refresh_interval_secs: u64,
    pub engagement_monitor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_interval_secs: Option<u64>,
}

fn classifier_status(state: &AppState) -> ClassifierStatus {
    let review_threshold = state.config.smart_log.review_threshold;
    let provider = match state.llm.backend() {
        LlmBackend::Unavailable { reason } => {
            return ClassifierStatus {
                status: "unavailable".to_string(),
                provider: None,
                model: None,
                reason: Some(reason.clone()),
                review_threshold,
            }
        }
        LlmBackend::OpenAI => "openai",
        LlmBackend::OpenRouter => "openrouter",
        LlmBackend::Ollama => "ollama",
        LlmBackend::LmStudio => "lmstudio",
        LlmBackend::OpenAICompatible { .. } => "openai-compatible",
    };

    ClassifierStatus {
        status: "available".to_string(),
        provider: Some(provider.to_string()),
        model: state.llm.config().map(|c| c.model.clone()),
        reason: None,
        review_threshold,
    }
}

/// `GET /api/v1/health`
///
/// Smart logs stay `pending`/`failed` while the classifier is unavailable;
/// every other endpoint keeps working.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    operation_id = "health.check",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let database_ok = match state.db.sync().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database sync failed during health check");
            false
        }
    };

    let engagement = &state.config.engagement;
    let background = BackgroundStatus {
        progress_refresh_interval_secs: state.config.progress.refresh_interval_secs,
        engagement_monitor: engagement.enabled,
        engagement_interval_secs: engagement.enabled.then_some(engagement.interval_secs),
    };

    ApiResponse::success(HealthData {
        status: if database_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseStatus {
            status: if database_ok { "ok" } else { "error" }.to_string(),
        },
        classifier: classifier_status(&state),
        background,
    })
}
