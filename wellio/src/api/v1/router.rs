use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let clients = Router::new()
        .route(
            "/",
            get(handlers::clients::list_clients).post(handlers::clients::create_client),
        )
        .route(
            "/{clientId}",
            get(handlers::clients::get_client)
                .patch(handlers::clients::update_client)
                .delete(handlers::clients::archive_client),
        )
        .route(
            "/{clientId}/goals",
            get(handlers::goals::list_goals).post(handlers::goals::create_goal),
        )
        .route(
            "/{clientId}/events",
            get(handlers::events::list_events).post(handlers::events::log_event),
        )
        .route(
            "/{clientId}/smart-logs",
            get(handlers::smart_logs::list_smart_logs)
                .post(handlers::smart_logs::create_smart_log),
        )
        .route(
            "/{clientId}/progress",
            get(handlers::progress::compute_progress).post(handlers::progress::update_progress),
        )
        .route(
            "/{clientId}/triggers",
            get(handlers::triggers::list_triggers),
        )
        .route(
            "/{clientId}/triggers:evaluate",
            post(handlers::triggers::evaluate_triggers),
        );

    let goals = Router::new().route("/{goalId}", patch(handlers::goals::update_goal));
    let events = Router::new().route("/{eventId}", patch(handlers::events::correct_event));
    let smart_logs = Router::new()
        .route("/{smartLogId}", get(handlers::smart_logs::get_smart_log))
        .route(
            "/{smartLogId}/reprocess",
            post(handlers::smart_logs::reprocess_smart_log),
        );
    let triggers = Router::new().route(
        "/{triggerId}/resolve",
        post(handlers::triggers::resolve_trigger),
    );
    let webhooks = Router::new().route("/{provider}", post(handlers::webhooks::ingest_webhook));

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .nest("/clients", clients)
        .nest("/goals", goals)
        .nest("/events", events)
        .nest("/smart-logs", smart_logs)
        .nest("/triggers", triggers)
        .nest("/webhooks", webhooks)
        .route(
            "/admin/progress:recalculate",
            post(handlers::admin::recalculate_progress),
        )
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
