use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::errors::{ApiError, ServiceError};
use crate::handlers::AppState;
use crate::pdf;
use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use uuid::Uuid;

use crate::services::inspections::{CreateInspectionRequest, UpdateInspectionRequest};

/// Create the inspection report for a job card
#[utoipa::path(
    post,
    path = "/api/v1/job-cards/{id}/inspection",
    params(("id" = Uuid, Path, description = "Job card ID")),
    request_body = CreateInspectionRequest,
    responses(
        (status = 201, description = "Report created"),
        (status = 404, description = "Job card not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Report already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn create_inspection(
    State(state): State<AppState>,
    Path(job_card_id): Path<Uuid>,
    Json(payload): Json<CreateInspectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let report = state
        .services
        .inspections
        .create_report(job_card_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(report))
}

/// List inspection reports
#[utoipa::path(
    get,
    path = "/api/v1/inspections",
    responses((status = 200, description = "Reports listed")),
    tag = "inspections"
)]
pub async fn list_inspections(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let reports = state
        .services
        .inspections
        .list_reports()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(reports))
}

/// Retrieve a report with findings, parts and consumables
#[utoipa::path(
    get,
    path = "/api/v1/inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection report ID")),
    responses(
        (status = 200, description = "Report fetched"),
        (status = 404, description = "Report not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn get_inspection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .inspections
        .get_report(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Replace the report's findings with the submitted set
#[utoipa::path(
    put,
    path = "/api/v1/inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection report ID")),
    request_body = UpdateInspectionRequest,
    responses(
        (status = 200, description = "Report updated"),
        (status = 404, description = "Report not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn update_inspection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInspectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let report = state
        .services
        .inspections
        .update_report(id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Delete an inspection report
#[utoipa::path(
    delete,
    path = "/api/v1/inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection report ID")),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 404, description = "Report not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn delete_inspection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .inspections
        .delete_report(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Export an inspection report as PDF
#[utoipa::path(
    get,
    path = "/api/v1/inspections/{id}/pdf",
    params(("id" = Uuid, Path, description = "Inspection report ID")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, description = "Report not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inspections"
)]
pub async fn inspection_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state
        .services
        .inspections
        .get_report_document(id)
        .await
        .map_err(map_service_error)?;

    let filename = format!("inspection-report-{}.pdf", document.job_card.job_number);
    let source = pdf::inspection_report_source(&document, &state.config.workshop);

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
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inspections))
        .route("/:id", get(get_inspection))
        .route("/:id", put(update_inspection))
        .route("/:id", delete(delete_inspection))
        .route("/:id/pdf", get(inspection_pdf))
}

/// Routes mounted under `/job-cards`.
pub fn job_card_routes() -> Router<AppState> {
    Router::new().route("/:id/inspection", post(create_inspection))
}
