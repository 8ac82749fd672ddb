use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::errors::ApiError;
use crate::handlers::AppState;
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::services::job_cards::{
    AddJobNoteRequest, JobCardIntakeRequest, JobCardScope, SetJobStatusRequest,
    UpdateJobCardRequest,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JobCardListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Board slice: active (default workflow view), completed, or all
    #[serde(default)]
    pub scope: Option<JobCardScope>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

/// Open a job card from the flattened intake form
#[utoipa::path(
    post,
    path = "/api/v1/job-cards",
    request_body = JobCardIntakeRequest,
    responses(
        (status = 201, description = "Job card opened"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn intake_job_card(
    State(state): State<AppState>,
    Json(payload): Json<JobCardIntakeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let job_card = state
        .services
        .job_cards
        .intake(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(job_card))
}

/// List job cards for a board scope
#[utoipa::path(
    get,
    path = "/api/v1/job-cards",
    params(JobCardListQuery),
    responses((status = 200, description = "Job cards listed")),
    tag = "job-cards"
)]
pub async fn list_job_cards(
    State(state): State<AppState>,
    Query(query): Query<JobCardListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let job_cards = state
        .services
        .job_cards
        .list_job_cards(
            query.scope.unwrap_or_default(),
            query.page,
            query.per_page,
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(job_cards))
}

/// Retrieve a job card with customer, vehicle and document flags
#[utoipa::path(
    get,
    path = "/api/v1/job-cards/{id}",
    params(("id" = Uuid, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Job card fetched"),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn get_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state
        .services
        .job_cards
        .get_job_card_detail(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(detail))
}

/// Update a job card's comments and intake time
#[utoipa::path(
    put,
    path = "/api/v1/job-cards/{id}",
    params(("id" = Uuid, Path, description = "Job card ID")),
    request_body = UpdateJobCardRequest,
    responses(
        (status = 200, description = "Job card updated"),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn update_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobCardRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let job_card = state
        .services
        .job_cards
        .update_job_card(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(job_card))
}

/// Move a job card to any workshop stage
#[utoipa::path(
    put,
    path = "/api/v1/job-cards/{id}/status",
    params(("id" = Uuid, Path, description = "Job card ID")),
    request_body = SetJobStatusRequest,
    responses(
        (status = 200, description = "Status set"),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn set_job_card_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetJobStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let job_card = state
        .services
        .job_cards
        .set_status(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(job_card))
}

/// Delete a job card
#[utoipa::path(
    delete,
    path = "/api/v1/job-cards/{id}",
    params(("id" = Uuid, Path, description = "Job card ID")),
    responses(
        (status = 204, description = "Job card deleted"),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn delete_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .job_cards
        .delete_job_card(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Append a workshop note
#[utoipa::path(
    post,
    path = "/api/v1/job-cards/{id}/notes",
    params(("id" = Uuid, Path, description = "Job card ID")),
    request_body = AddJobNoteRequest,
    responses(
        (status = 201, description = "Note added"),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn add_job_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddJobNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let note = state
        .services
        .job_cards
        .add_note(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(note))
}

/// Notes on a job card, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/job-cards/{id}/notes",
    params(("id" = Uuid, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Notes listed"),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse)
    ),
    tag = "job-cards"
)]
pub async fn list_job_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = state
        .services
        .job_cards
        .list_notes(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(notes))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(intake_job_card))
        .route("/", get(list_job_cards))
        .route("/:id", get(get_job_card))
        .route("/:id", put(update_job_card))
        .route("/:id", delete(delete_job_card))
        .route("/:id/status", put(set_job_card_status))
        .route("/:id/notes", post(add_job_note))
        .route("/:id/notes", get(list_job_notes))
        .merge(super::inspections::job_card_routes())
        .merge(super::quotations::job_card_routes())
}
