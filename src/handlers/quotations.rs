use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginationParams,
};
use crate::errors::{ApiError, ServiceError};
use crate::handlers::AppState;
use crate::pdf;
use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::services::quotations::{CreateQuotationRequest, UpdateQuotationRequest};

/// Issue a quotation for a job card
#[utoipa::path(
    post,
    path = "/api/v1/job-cards/{id}/quotations",
    params(("id" = Uuid, Path, description = "Job card ID")),
    request_body = CreateQuotationRequest,
    responses(
        (status = 201, description = "Quotation issued"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse)
    ),
    tag = "quotations"
)]
pub async fn create_quotation(
    State(state): State<AppState>,
    Path(job_card_id): Path<Uuid>,
    Json(payload): Json<CreateQuotationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let quotation = state
        .services
        .quotations
        .create_quotation(job_card_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(quotation))
}

/// List quotations with computed totals
#[utoipa::path(
    get,
    path = "/api/v1/quotations",
    params(PaginationParams),
    responses((status = 200, description = "Quotations listed")),
    tag = "quotations"
)]
pub async fn list_quotations(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let quotations = state
        .services
        .quotations
        .list_quotations(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(quotations))
}

/// Active job cards that have no quotation yet
#[utoipa::path(
    get,
    path = "/api/v1/quotations/eligible-job-cards",
    responses((status = 200, description = "Job cards listed")),
    tag = "quotations"
)]
pub async fn eligible_job_cards(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let job_cards = state
        .services
        .quotations
        .eligible_job_cards()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(job_cards))
}

/// Retrieve a quotation with items and totals
#[utoipa::path(
    get,
    path = "/api/v1/quotations/{id}",
    params(("id" = Uuid, Path, description = "Quotation ID")),
    responses(
        (status = 200, description = "Quotation fetched"),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "quotations"
)]
pub async fn get_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let quotation = state
        .services
        .quotations
        .get_quotation(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(quotation))
}

/// Update percentages and replace the item set
#[utoipa::path(
    put,
    path = "/api/v1/quotations/{id}",
    params(("id" = Uuid, Path, description = "Quotation ID")),
    request_body = UpdateQuotationRequest,
    responses(
        (status = 200, description = "Quotation updated"),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "quotations"
)]
pub async fn update_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuotationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let quotation = state
        .services
        .quotations
        .update_quotation(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(quotation))
}

/// Delete a quotation
#[utoipa::path(
    delete,
    path = "/api/v1/quotations/{id}",
    params(("id" = Uuid, Path, description = "Quotation ID")),
    responses(
        (status = 204, description = "Quotation deleted"),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "quotations"
)]
pub async fn delete_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .quotations
        .delete_quotation(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Export a quotation as PDF
#[utoipa::path(
    get,
    path = "/api/v1/quotations/{id}/pdf",
    params(("id" = Uuid, Path, description = "Quotation ID")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, description = "Quotation not found", body = crate::errors::ErrorResponse)
    ),
    tag = "quotations"
)]
pub async fn quotation_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state
        .services
        .quotations
        .get_quotation_document(id)
        .await
        .map_err(map_service_error)?;

    let filename = format!("Quotation-{}.pdf", document.quotation.quotation_number);
    let source = pdf::quotation_source(&document, &state.config.workshop);

    // Typst compilation is CPU-bound; keep it off the async workers
    let bytes = tokio::task::spawn_blocking(move || pdf::render_pdf(source))
        .await
        .map_err(|e| ServiceError::InternalError(format!("PDF task failed: {e}")))
        .map_err(map_service_error)?
        .map_err(map_service_error)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotations))
        .route("/eligible-job-cards", get(eligible_job_cards))
        .route("/:id", get(get_quotation))
        .route("/:id", put(update_quotation))
        .route("/:id", delete(delete_quotation))
        .route("/:id/pdf", get(quotation_pdf))
}

/// Routes mounted under `/job-cards`.
pub fn job_card_routes() -> Router<AppState> {
    Router::new().route("/:id/quotations", post(create_quotation))
}
