use super::common::map_service_error;
use crate::errors::ApiError;
use crate::handlers::AppState;
use crate::services::job_cards::{JobCardListResponse, JobCardScope, StatusCount};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde::Serialize;

const RECENT_JOB_CARDS: u64 = 10;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DashboardResponse {
    pub status_counts: Vec<StatusCount>,
    pub open_job_cards: u64,
    pub recent: JobCardListResponse,
}

/// Workshop overview: job-card counts per stage and recent intakes
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses((status = 200, description = "Dashboard data", body = DashboardResponse)),
    tag = "dashboard"
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let status_counts = state
        .services
        .job_cards
        .status_counts()
        .await
        .map_err(map_service_error)?;

    let open_job_cards = status_counts
        .iter()
        .filter(|entry| entry.status.is_active())
        .map(|entry| entry.count)
        .sum();

    let recent = state
        .services
        .job_cards
        .list_job_cards(JobCardScope::All, 1, RECENT_JOB_CARDS)
        .await
        .map_err(map_service_error)?;

    Ok(Json(DashboardResponse {
        status_counts,
        open_job_cards,
        recent,
    }))
}
