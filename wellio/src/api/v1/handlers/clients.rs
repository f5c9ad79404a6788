//! v1 Client handlers.

use axum::extract::{Path, State};
use axum_extra::extract::Query;
use chrono::Utc;
use nanoid::nanoid;

use crate::api::v1::dto::{
    ClientResponse, CreateClientRequest, ListClientsQuery, UpdateClientRequest,
};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::models::Client;

fn validate_create(req: &CreateClientRequest) -> Result<(), &'static str> {
    if req.coach_id.trim().is_empty() {
        return Err("coachId cannot be empty");
    }
    if req.name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    if matches!(req.age, Some(age) if age == 0 || age > 120) {
        return Err("Age must be between 1 and 120");
    }
    if matches!(req.weight_kg, Some(w) if !w.is_finite() || w <= 0.0) {
        return Err("weightKg must be positive");
    }
    if matches!(req.height_cm, Some(h) if !h.is_finite() || h <= 0.0) {
        return Err("heightCm must be positive");
    }
    Ok(())
}

/// `POST /api/v1/clients`
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    tag = "clients",
    operation_id = "clients.create",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_client(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<CreateClientRequest>,
) -> ApiResponse<ClientResponse> {
    if let Err(msg) = validate_create(&req) {
        return ApiResponse::error(ErrorCode::InvalidRequest, msg);
    }

    let mut client = Client::new(
        nanoid!(),
        req.coach_id.trim().to_string(),
        req.name.trim().to_string(),
    );
    client.email = req.email;
    client.sex = req.sex;
    client.age = req.age;
    client.weight_kg = req.weight_kg;
    client.height_cm = req.height_cm;
    client.activity_level = req.activity_level;
    client.goal_type = req.goal_type;
    client.goal_description = req.goal_description;

    if let Err(e) = state.db.create_client(&client).await {
        return e.into();
    }

    tracing::info!(client_id = %client.id, coach_id = %client.coach_id, "Client created");
    ApiResponse::created(ClientResponse::from(client))
}

/// `GET /api/v1/clients`
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    tag = "clients",
    operation_id = "clients.list",
    params(ListClientsQuery),
    responses(
        (status = 200, description = "Clients", body = Vec<ClientResponse>),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> ApiResponse<Vec<ClientResponse>> {
    match state
        .db
        .list_clients(
            query.coach_id.as_deref(),
            query.include_archived.unwrap_or(false),
        )
        .await
    {
        Ok(clients) => {
            let total = clients.len();
            let data = clients.into_iter().map(ClientResponse::from).collect();
            ApiResponse::success_with_total(data, total)
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/clients/{clientId}`
#[utoipa::path(
    get,
    path = "/api/v1/clients/{clientId}",
    tag = "clients",
    operation_id = "clients.get",
    params(("clientId" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client found", body = ClientResponse),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<ClientResponse> {
    match state.db.get_client(&id).await {
        Ok(Some(client)) => ApiResponse::success(ClientResponse::from(client)),
        Ok(None) => ApiResponse::error(ErrorCode::NotFound, format!("Client {id} not found")),
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/clients/{clientId}`
#[utoipa::path(
    patch,
    path = "/api/v1/clients/{clientId}",
    tag = "clients",
    operation_id = "clients.update",
    params(("clientId" = String, Path, description = "Client ID")),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    axum::Json(req): axum::Json<UpdateClientRequest>,
) -> ApiResponse<ClientResponse> {
    let mut client = match state.db.get_client(&id).await {
        Ok(Some(client)) => client,
        Ok(None) => {
            return ApiResponse::error(ErrorCode::NotFound, format!("Client {id} not found"))
        }
        Err(e) => return e.into(),
    };

    if let Some(name) = req.name {
        if name.trim().is_empty() {
            return ApiResponse::error(ErrorCode::InvalidRequest, "Name cannot be empty");
        }
        client.name = name.trim().to_string();
    }
    if req.email.is_some() {
        client.email = req.email;
    }
    if req.sex.is_some() {
        client.sex = req.sex;
    }
    if let Some(age) = req.age {
        if age == 0 || age > 120 {
            return ApiResponse::error(ErrorCode::InvalidRequest, "Age must be between 1 and 120");
        }
        client.age = Some(age);
    }
    if req.weight_kg.is_some() {
        client.weight_kg = req.weight_kg;
    }
    if req.height_cm.is_some() {
        client.height_cm = req.height_cm;
    }
    if req.activity_level.is_some() {
        client.activity_level = req.activity_level;
    }
    if req.goal_type.is_some() {
        client.goal_type = req.goal_type;
    }
    if req.goal_description.is_some() {
        client.goal_description = req.goal_description;
    }
    client.updated_at = Utc::now();

    match state.db.update_client_profile(&client).await {
        Ok(_) => ApiResponse::success(ClientResponse::from(client)),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/clients/{clientId}`
///
/// Archives the client. History is kept; archived clients are skipped by
/// batch jobs and reject new input.
#[utoipa::path(
    delete,
    path = "/api/v1/clients/{clientId}",
    tag = "clients",
    operation_id = "clients.archive",
    params(("clientId" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client archived", body = ClientResponse),
        (status = 404, description = "Client not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn archive_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<ClientResponse> {
    match state.db.archive_client(&id, Utc::now()).await {
        Ok(true) => tracing::info!(client_id = %id, "Client archived"),
        Ok(false) => {}
        Err(e) => return e.into(),
    }

    match state.db.get_client(&id).await {
        Ok(Some(client)) => ApiResponse::success(ClientResponse::from(client)),
        Ok(None) => ApiResponse::error(ErrorCode::NotFound, format!("Client {id} not found")),
        Err(e) => e.into(),
    }
}
