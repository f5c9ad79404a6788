//! v1 Progress event handlers.

use axum::extract::{Path, State};
use axum_extra::extract::Query;
use chrono::{DateTime, Utc};

use crate::api::v1::dto::{CorrectEventRequest, EventResponse, ListEventsQuery, LogEventRequest};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::db::EventQuery;
use crate::models::EventType;

const DEFAULT_EVENT_LIMIT: u32 = 100;
const MAX_EVENT_LIMIT: u32 = 1000;

fn to_event_query(query: ListEventsQuery) -> Result<EventQuery, String> {
    let since = query
        .since
        .as_deref()
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| format!("Invalid since timestamp: {s}"))
        })
        .transpose()?;
    let event_type = query
        .event_type
        .as_deref()
        .map(str::parse::<EventType>)
        .transpose()?;

    Ok(EventQuery {
        since,
        event_type,
        include_superseded: query.include_superseded.unwrap_or(false),
        limit: Some(
            query
                .limit
                .unwrap_or(DEFAULT_EVENT_LIMIT)
                .clamp(1, MAX_EVENT_LIMIT),
        ),
    })
}

/// `POST /api/v1/clients/{clientId}/events`
#[utoipa::path(
    post,
    path = "/api/v1/clients/{clientId}/events",
    tag = "events",
    operation_id = "events.log",
    params(("clientId" = String, Path, description = "Client ID")),
    request_body = LogEventRequest,
    responses(
        (status = 201, description = "Event recorded", body = EventResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn log_event(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    axum::Json(req): axum::Json<LogEventRequest>,
) -> ApiResponse<EventResponse> {
    match state.events.record_explicit(&client_id, req.0).await {
        Ok(event) => ApiResponse::created(EventResponse::from(event)),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/clients/{clientId}/events`
///
/// Newest first.
#[utoipa::path(
    get,
    path = "/api/v1/clients/{clientId}/events",
    tag = "events",
    operation_id = "events.list",
    params(
        ("clientId" = String, Path, description = "Client ID"),
        ListEventsQuery,
    ),
    responses(
        (status = 200, description = "Events", body = Vec<EventResponse>),
        (status = 400, description = "Invalid query", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_events(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Query(query): Query<ListEventsQuery>,
) -> ApiResponse<Vec<EventResponse>> {
    let query = match to_event_query(query) {
        Ok(q) => q,
        Err(msg) => return ApiResponse::error(ErrorCode::InvalidRequest, msg),
    };

    match state.events.list(&client_id, &query).await {
        Ok(events) => {
            let total = events.len();
            let data = events.into_iter().map(EventResponse::from).collect();
            ApiResponse::success_with_total(data, total)
        }
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/events/{eventId}`
///
/// Coach correction. Clears `needsReview`.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{eventId}",
    tag = "events",
    operation_id = "events.correct",
    params(("eventId" = String, Path, description = "Event ID")),
    request_body = CorrectEventRequest,
    responses(
        (status = 200, description = "Event corrected", body = EventResponse),
        (status = 400, description = "Invalid correction", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn correct_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Json(req): axum::Json<CorrectEventRequest>,
) -> ApiResponse<EventResponse> {
    match state
        .events
        .correct(&id, req.event_type.as_deref(), req.data)
        .await
    {
        Ok(event) => ApiResponse::success(EventResponse::from(event)),
        Err(e) => e.into(),
    }
}
