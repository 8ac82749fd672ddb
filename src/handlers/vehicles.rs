use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginationParams,
};
use crate::errors::ApiError;
use crate::handlers::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::services::vehicles::{CreateVehicleRequest, UpdateVehicleRequest};

/// Register a vehicle
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Plate already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let vehicle = state
        .services
        .vehicles
        .create_vehicle(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(vehicle))
}

/// Retrieve a vehicle by id
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    params(("id" = Uuid, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle fetched"),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicle = state
        .services
        .vehicles
        .get_vehicle(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(vehicle))
}

/// List vehicles
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    params(PaginationParams),
    responses((status = 200, description = "Vehicles listed")),
    tag = "vehicles"
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let vehicles = state
        .services
        .vehicles
        .list_vehicles(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(vehicles))
}

/// Update a vehicle
#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    params(("id" = Uuid, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Vehicle updated"),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Plate already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let vehicle = state
        .services
        .vehicles
        .update_vehicle(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(vehicle))
}

/// Delete a vehicle
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    params(("id" = Uuid, Path, description = "Vehicle ID")),
    responses(
        (status = 204, description = "Vehicle deleted"),
        (status = 404, description = "Vehicle not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vehicles"
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .vehicles
        .delete_vehicle(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vehicle))
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
}
