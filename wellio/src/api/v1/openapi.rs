use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wellio API",
        version = "1.0.0",
        description = "Client progress tracking for fitness coaches. Explicit logs, smart logs, device sync, progress scores and engagement triggers.",
    ),
    paths(
        handlers::health::health_check,
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::update_client,
        handlers::clients::archive_client,
        handlers::goals::create_goal,
        handlers::goals::list_goals,
        handlers::goals::update_goal,
        handlers::events::log_event,
        handlers::events::list_events,
        handlers::events::correct_event,
        handlers::smart_logs::create_smart_log,
        handlers::smart_logs::list_smart_logs,
        handlers::smart_logs::get_smart_log,
        handlers::smart_logs::reprocess_smart_log,
        handlers::progress::compute_progress,
        handlers::progress::update_progress,
        handlers::triggers::list_triggers,
        handlers::triggers::evaluate_triggers,
        handlers::triggers::resolve_trigger,
        handlers::webhooks::ingest_webhook,
        handlers::admin::recalculate_progress,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Common
        dto::common::V1GoalStatus,
        dto::common::V1AuthorType,
        // Clients
        dto::clients::CreateClientRequest,
        dto::clients::UpdateClientRequest,
        dto::clients::ClientResponse,
        // Goals
        dto::goals::CreateGoalRequest,
        dto::goals::UpdateGoalRequest,
        dto::goals::GoalResponse,
        // Events
        dto::events::LogEventRequest,
        dto::events::CorrectEventRequest,
        dto::events::EventResponse,
        // Smart logs
        dto::smart_logs::CreateSmartLogRequest,
        dto::smart_logs::SmartLogResponse,
        // Progress
        dto::progress::ProgressScoreResponse,
        dto::progress::ProgressFailureResponse,
        dto::progress::BatchProgressResponse,
        // Triggers
        dto::triggers::ResolveTriggerRequest,
        dto::triggers::TriggerResponse,
        // Webhooks
        handlers::webhooks::DeviceWebhookPayload,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::ClassifierStatus,
        handlers::health::BackgroundStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "clients", description = "Client profiles and archiving"),
        (name = "goals", description = "Client goals"),
        (name = "events", description = "Explicit logs, event listing and coach corrections"),
        (name = "smart-logs", description = "Free-text logs classified in the background"),
        (name = "progress", description = "Composite progress scores"),
        (name = "triggers", description = "Engagement triggers for coaches"),
        (name = "webhooks", description = "Wearables device sync"),
        (name = "admin", description = "Administrative operations (auth required)"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
