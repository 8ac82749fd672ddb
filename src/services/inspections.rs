use crate::{
    db::DbPool,
    entities::{
        customer,
        inspection_finding::{self, Severity},
        inspection_report, job_card,
        required_consumable::{self, ConsumableUnit},
        required_part::{self, PartStatus},
        vehicle,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct RequiredPartRequest {
    pub part_number: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Part description is required"))]
    pub description: String,
    #[validate(range(min = 1, message = "Part quantity must be positive"))]
    pub quantity: i32,
    #[serde(default)]
    pub status: Option<PartStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct RequiredConsumableRequest {
    #[validate(length(min = 1, max = 100, message = "Consumable name is required"))]
    pub name: String,
    #[validate(range(min = 0.01, message = "Consumable quantity must be positive"))]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<ConsumableUnit>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct FindingRequest {
    #[validate(length(min = 1, message = "Finding description is required"))]
    pub description: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[validate(range(min = 0.0, message = "Estimated hours cannot be negative"))]
    pub estimated_hours: Option<f64>,
    pub remarks: Option<String>,
    #[serde(default)]
    #[validate]
    pub parts: Vec<RequiredPartRequest>,
    #[serde(default)]
    #[validate]
    pub consumables: Vec<RequiredConsumableRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateInspectionRequest {
    #[serde(default)]
    #[validate]
    pub findings: Vec<FindingRequest>,
}

/// Full nested update: the submitted findings (with their parts and
/// consumables) replace the stored set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateInspectionRequest {
    #[validate]
    pub findings: Vec<FindingRequest>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FindingDetail {
    #[serde(flatten)]
    pub finding: inspection_finding::Model,
    pub parts: Vec<required_part::Model>,
    pub consumables: Vec<required_consumable::Model>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct InspectionDetail {
    #[serde(flatten)]
    pub report: inspection_report::Model,
    pub findings: Vec<FindingDetail>,
    pub total_findings: u64,
    pub total_estimated_hours: f64,
}

/// Listing row: report plus the job card and vehicle it belongs to.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct InspectionSummary {
    #[serde(flatten)]
    pub report: inspection_report::Model,
    pub job_card: Option<job_card::Model>,
    pub vehicle: Option<vehicle::Model>,
    pub total_findings: u64,
}

/// Everything the PDF renderer needs for one report.
#[derive(Debug)]
pub struct InspectionDocument {
    pub report: inspection_report::Model,
    pub findings: Vec<FindingDetail>,
    pub total_estimated_hours: f64,
    pub job_card: job_card::Model,
    pub customer: customer::Model,
    pub vehicle: vehicle::Model,
}

/// Service for managing inspection reports.
#[derive(Clone)]
pub struct InspectionService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl InspectionService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send inspection event");
            }
        }
    }

    /// Creates the report for a job card. A job card carries at most one
    /// report; a second create is a conflict.
    #[instrument(skip(self, request), fields(job_card_id = %job_card_id))]
    pub async fn create_report(
        &self,
        job_card_id: Uuid,
        request: CreateInspectionRequest,
    ) -> Result<InspectionDetail, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start inspection transaction");
            ServiceError::DatabaseError(e)
        })?;

        job_card::Entity::find_by_id(job_card_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Job card {job_card_id} not found")))?;

        let existing = inspection_report::Entity::find()
            .filter(inspection_report::Column::JobCardId.eq(job_card_id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Job card {job_card_id} already has an inspection report"
            )));
        }

        let id = Uuid::new_v4();
        let report = inspection_report::ActiveModel {
            id: Set(id),
            job_card_id: Set(job_card_id),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, report_id = %id, "Failed to create inspection report");
            ServiceError::DatabaseError(e)
        })?;

        let findings = insert_findings(&txn, id, &request.findings).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, report_id = %id, "Failed to commit inspection transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            report_id = %id,
            job_card_id = %job_card_id,
            findings = findings.len(),
            "Inspection report created"
        );
        self.emit(Event::InspectionReportCreated {
            job_card_id,
            report_id: id,
        })
        .await;

        Ok(detail_from_parts(report, findings))
    }

    /// Fetches a report with findings, parts, consumables and totals.
    #[instrument(skip(self))]
    pub async fn get_report(&self, id: Uuid) -> Result<InspectionDetail, ServiceError> {
        let db = &*self.db_pool;

        let report = inspection_report::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inspection report {id} not found")))?;

        let findings = load_findings(db, id).await?;
        Ok(detail_from_parts(report, findings))
    }

    /// Report attached to a job card, when one exists.
    #[instrument(skip(self))]
    pub async fn get_report_for_job_card(
        &self,
        job_card_id: Uuid,
    ) -> Result<Option<inspection_report::Model>, ServiceError> {
        let db = &*self.db_pool;
        let report = inspection_report::Entity::find()
            .filter(inspection_report::Column::JobCardId.eq(job_card_id))
            .one(db)
            .await?;
        Ok(report)
    }

    /// Lists reports, newest first, with their job card and vehicle.
    #[instrument(skip(self))]
    pub async fn list_reports(&self) -> Result<Vec<InspectionSummary>, ServiceError> {
        let db = &*self.db_pool;

        let reports = inspection_report::Entity::find()
            .order_by_desc(inspection_report::Column::CreatedAt)
            .all(db)
            .await?;

        let mut summaries = Vec::with_capacity(reports.len());
        for report in reports {
            let card = job_card::Entity::find_by_id(report.job_card_id)
                .one(db)
                .await?;
            let vehicle = match &card {
                Some(card) => vehicle::Entity::find_by_id(card.vehicle_id).one(db).await?,
                None => None,
            };
            let total_findings = inspection_finding::Entity::find()
                .filter(inspection_finding::Column::ReportId.eq(report.id))
                .count(db)
                .await?;

            summaries.push(InspectionSummary {
                report,
                job_card: card,
                vehicle,
                total_findings,
            });
        }

        Ok(summaries)
    }

    /// Replaces the report's findings (and their parts/consumables) with
    /// the submitted set in one transaction.
    #[instrument(skip(self, request))]
    pub async fn update_report(
        &self,
        id: Uuid,
        request: UpdateInspectionRequest,
    ) -> Result<InspectionDetail, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start inspection update transaction");
            ServiceError::DatabaseError(e)
        })?;

        let existing = inspection_report::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inspection report {id} not found")))?;

        let mut active: inspection_report::ActiveModel = existing.into();
        active.updated_at = Set(Some(Utc::now()));
        let report = active.update(&txn).await?;

        // Submitted rows are the set; stored findings cascade their
        // parts and consumables on delete
        inspection_finding::Entity::delete_many()
            .filter(inspection_finding::Column::ReportId.eq(id))
            .exec(&txn)
            .await?;
        let findings = insert_findings(&txn, id, &request.findings).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, report_id = %id, "Failed to commit inspection update");
            ServiceError::DatabaseError(e)
        })?;

        info!(report_id = %id, findings = findings.len(), "Inspection report updated");
        self.emit(Event::InspectionReportUpdated(id)).await;

        Ok(detail_from_parts(report, findings))
    }

    /// Deletes a report; findings and their rows cascade.
    #[instrument(skip(self))]
    pub async fn delete_report(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = inspection_report::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Inspection report {id} not found"
            )));
        }

        info!(report_id = %id, "Inspection report deleted");
        self.emit(Event::InspectionReportDeleted(id)).await;

        Ok(())
    }

    /// Assembles the full context the PDF renderer needs.
    #[instrument(skip(self))]
    pub async fn get_report_document(&self, id: Uuid) -> Result<InspectionDocument, ServiceError> {
        let db = &*self.db_pool;
        let detail = self.get_report(id).await?;

        let job_card = job_card::Entity::find_by_id(detail.report.job_card_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Inspection report {id} references missing job card {}",
                    detail.report.job_card_id
                ))
            })?;

        let customer = customer::Entity::find_by_id(job_card.customer_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Job card {} references missing customer {}",
                    job_card.id, job_card.customer_id
                ))
            })?;

        let vehicle = vehicle::Entity::find_by_id(job_card.vehicle_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Job card {} references missing vehicle {}",
                    job_card.id, job_card.vehicle_id
                ))
            })?;

        Ok(InspectionDocument {
            total_estimated_hours: detail.total_estimated_hours,
            report: detail.report,
            findings: detail.findings,
            job_card,
            customer,
            vehicle,
        })
    }
}

async fn load_findings<C: ConnectionTrait>(
    conn: &C,
    report_id: Uuid,
) -> Result<Vec<FindingDetail>, ServiceError> {
    let findings = inspection_finding::Entity::find()
        .filter(inspection_finding::Column::ReportId.eq(report_id))
        .all(conn)
        .await?;

    let mut details = Vec::with_capacity(findings.len());
    for finding in findings {
        let parts = required_part::Entity::find()
            .filter(required_part::Column::FindingId.eq(finding.id))
            .all(conn)
            .await?;
        let consumables = required_consumable::Entity::find()
            .filter(required_consumable::Column::FindingId.eq(finding.id))
            .all(conn)
            .await?;
        details.push(FindingDetail {
            finding,
            parts,
            consumables,
        });
    }

    Ok(details)
}

async fn insert_findings<C: ConnectionTrait>(
    conn: &C,
    report_id: Uuid,
    requests: &[FindingRequest],
) -> Result<Vec<FindingDetail>, ServiceError> {
    let mut details = Vec::with_capacity(requests.len());

    for request in requests {
        let finding = inspection_finding::ActiveModel {
            id: Set(Uuid::new_v4()),
            report_id: Set(report_id),
            description: Set(request.description.clone()),
            severity: Set(request.severity.unwrap_or(Severity::Medium)),
            estimated_hours: Set(request.estimated_hours.unwrap_or(1.0)),
            remarks: Set(request.remarks.clone()),
        }
        .insert(conn)
        .await?;

        let mut parts = Vec::with_capacity(request.parts.len());
        for part in &request.parts {
            parts.push(
                required_part::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    finding_id: Set(finding.id),
                    part_number: Set(part.part_number.clone()),
                    description: Set(part.description.clone()),
                    quantity: Set(part.quantity),
                    status: Set(part.status.unwrap_or(PartStatus::Required)),
                    notes: Set(part.notes.clone()),
                }
                .insert(conn)
                .await?,
            );
        }

        let mut consumables = Vec::with_capacity(request.consumables.len());
        for consumable in &request.consumables {
            consumables.push(
                required_consumable::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    finding_id: Set(finding.id),
                    name: Set(consumable.name.clone()),
                    quantity: Set(consumable.quantity),
                    unit: Set(consumable.unit.unwrap_or(ConsumableUnit::Pcs)),
                    notes: Set(consumable.notes.clone()),
                }
                .insert(conn)
                .await?,
            );
        }

        details.push(FindingDetail {
            finding,
            parts,
            consumables,
        });
    }

    Ok(details)
}

fn detail_from_parts(
    report: inspection_report::Model,
    findings: Vec<FindingDetail>,
) -> InspectionDetail {
    let total_findings = findings.len() as u64;
    let total_estimated_hours = findings.iter().map(|f| f.finding.estimated_hours).sum();
    InspectionDetail {
        report,
        findings,
        total_findings,
        total_estimated_hours,
    }
}
