use crate::{
    db::DbPool,
    entities::{
        customer, inspection_report,
        job_card::{self, JobStatus},
        job_note, quotation, vehicle,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::vehicles::{self, CreateVehicleRequest},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Flattened intake form: customer, vehicle and job fields in one
/// request, mirroring the front-desk paper card.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct JobCardIntakeRequest {
    // Customer block
    #[validate(length(min = 1, max = 100, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 20, message = "Customer phone is required"))]
    pub customer_phone: String,
    #[validate(email(message = "Customer email must be a valid address"))]
    pub customer_email: Option<String>,
    pub customer_company: Option<String>,
    pub customer_trn: Option<String>,

    // Vehicle block
    #[validate(length(min = 1, max = 50, message = "Vehicle make is required"))]
    pub vehicle_make: String,
    #[validate(length(min = 1, max = 50, message = "Vehicle model is required"))]
    pub vehicle_model: String,
    #[validate(length(min = 1, max = 30, message = "Vehicle color is required"))]
    pub vehicle_color: String,
    #[validate(range(min = 1900, max = 2100, message = "Vehicle year must be plausible"))]
    pub vehicle_year: i32,
    #[validate(length(min = 1, max = 20, message = "Vehicle plate is required"))]
    pub vehicle_plate: String,
    #[validate(length(max = 17, message = "VIN must be at most 17 characters"))]
    pub vehicle_vin: Option<String>,
    pub vehicle_mileage: Option<i32>,

    // Job block
    pub status: Option<JobStatus>,
    pub customer_comments: Option<String>,
    pub workshop_comments: Option<String>,
    pub required_jobs: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateJobCardRequest {
    pub customer_comments: Option<String>,
    pub workshop_comments: Option<String>,
    pub required_jobs: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct SetJobStatusRequest {
    pub status: JobStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct AddJobNoteRequest {
    #[validate(length(min = 1, message = "Note text is required"))]
    pub note: String,
}

/// Which slice of the board a listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobCardScope {
    Active,
    Completed,
    #[default]
    All,
}

/// Job card joined with the records a board listing shows.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobCardSummary {
    #[serde(flatten)]
    pub job_card: job_card::Model,
    pub customer: Option<customer::Model>,
    pub vehicle: Option<vehicle::Model>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobCardListResponse {
    pub job_cards: Vec<JobCardSummary>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Job-card count for one workshop stage.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobCardDetail {
    #[serde(flatten)]
    pub job_card: job_card::Model,
    pub customer: customer::Model,
    pub vehicle: vehicle::Model,
    pub has_quotation: bool,
    pub has_inspection_report: bool,
}

/// Service for managing job cards and their notes.
#[derive(Clone)]
pub struct JobCardService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl JobCardService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send job card event");
            }
        }
    }

    /// Opens a job card from the flattened intake form. Customer and
    /// vehicle are get-or-created inside one transaction: the customer
    /// is matched by (name, phone), the vehicle by plate. Submitting the
    /// same plate twice reuses the existing vehicle record.
    #[instrument(skip(self, request), fields(plate = %request.vehicle_plate))]
    pub async fn intake(
        &self,
        request: JobCardIntakeRequest,
    ) -> Result<job_card::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start intake transaction");
            ServiceError::DatabaseError(e)
        })?;

        let customer = get_or_create_customer(&txn, &request).await?;

        let vehicle_fields = CreateVehicleRequest {
            customer_id: Some(customer.id),
            make: request.vehicle_make.clone(),
            model: request.vehicle_model.clone(),
            color: request.vehicle_color.clone(),
            year: request.vehicle_year,
            plate: request.vehicle_plate.clone(),
            vin: request.vehicle_vin.clone(),
            mileage: request.vehicle_mileage,
        };
        let vehicle = vehicles::get_or_create_by_plate(&txn, customer.id, &vehicle_fields).await?;

        let id = Uuid::new_v4();
        let job_number = next_job_number(&txn, now).await?;

        let model = job_card::ActiveModel {
            id: Set(id),
            job_number: Set(job_number),
            customer_id: Set(customer.id),
            vehicle_id: Set(vehicle.id),
            status: Set(request.status.unwrap_or(JobStatus::UnderInspection)),
            customer_comments: Set(request.customer_comments),
            workshop_comments: Set(request.workshop_comments),
            required_jobs: Set(request.required_jobs),
            received_at: Set(request.received_at.unwrap_or(now)),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, job_card_id = %id, "Failed to create job card");
            ServiceError::DatabaseError(e)
        })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, job_card_id = %id, "Failed to commit intake transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            job_card_id = %id,
            job_number = %model.job_number,
            customer_id = %customer.id,
            vehicle_id = %vehicle.id,
            "Job card opened"
        );
        self.emit(Event::JobCardCreated(id)).await;

        Ok(model)
    }

    /// Fetches a job card by id; errors when missing.
    #[instrument(skip(self))]
    pub async fn get_job_card(&self, id: Uuid) -> Result<job_card::Model, ServiceError> {
        let db = &*self.db_pool;
        job_card::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Job card {id} not found")))
    }

    /// Detail view: job card with customer, vehicle and document flags.
    #[instrument(skip(self))]
    pub async fn get_job_card_detail(&self, id: Uuid) -> Result<JobCardDetail, ServiceError> {
        let db = &*self.db_pool;
        let card = self.get_job_card(id).await?;

        let customer = customer::Entity::find_by_id(card.customer_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Job card {id} references missing customer {}",
                    card.customer_id
                ))
            })?;

        let vehicle = vehicle::Entity::find_by_id(card.vehicle_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Job card {id} references missing vehicle {}",
                    card.vehicle_id
                ))
            })?;

        let has_quotation = quotation::Entity::find()
            .filter(quotation::Column::JobCardId.eq(id))
            .count(db)
            .await?
            > 0;

        let has_inspection_report = inspection_report::Entity::find()
            .filter(inspection_report::Column::JobCardId.eq(id))
            .count(db)
            .await?
            > 0;

        Ok(JobCardDetail {
            job_card: card,
            customer,
            vehicle,
            has_quotation,
            has_inspection_report,
        })
    }

    /// Lists job cards for a board scope, newest intake first, joined
    /// with their customer and vehicle.
    #[instrument(skip(self))]
    pub async fn list_job_cards(
        &self,
        scope: JobCardScope,
        page: u64,
        per_page: u64,
    ) -> Result<JobCardListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = job_card::Entity::find();
        match scope {
            JobCardScope::Active => {
                query = query
                    .filter(job_card::Column::Status.is_not_in(JobStatus::completed_statuses()));
            }
            JobCardScope::Completed => {
                query =
                    query.filter(job_card::Column::Status.is_in(JobStatus::completed_statuses()));
            }
            JobCardScope::All => {}
        }

        let paginator = query
            .order_by_desc(job_card::Column::ReceivedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let cards = paginator.fetch_page(page.saturating_sub(1)).await?;

        // Batch-load the related records for the page
        let customer_ids: Vec<Uuid> = cards.iter().map(|c| c.customer_id).collect();
        let vehicle_ids: Vec<Uuid> = cards.iter().map(|c| c.vehicle_id).collect();

        let customers: HashMap<Uuid, customer::Model> = customer::Entity::find()
            .filter(customer::Column::Id.is_in(customer_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let vehicles: HashMap<Uuid, vehicle::Model> = vehicle::Entity::find()
            .filter(vehicle::Column::Id.is_in(vehicle_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        let job_cards = cards
            .into_iter()
            .map(|card| JobCardSummary {
                customer: customers.get(&card.customer_id).cloned(),
                vehicle: vehicles.get(&card.vehicle_id).cloned(),
                job_card: card,
            })
            .collect();

        Ok(JobCardListResponse {
            job_cards,
            total,
            page,
            per_page,
        })
    }

    /// Updates the free-text fields and intake time.
    #[instrument(skip(self, request))]
    pub async fn update_job_card(
        &self,
        id: Uuid,
        request: UpdateJobCardRequest,
    ) -> Result<job_card::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let existing = self.get_job_card(id).await?;

        let mut active: job_card::ActiveModel = existing.into();
        active.customer_comments = Set(request.customer_comments);
        active.workshop_comments = Set(request.workshop_comments);
        active.required_jobs = Set(request.required_jobs);
        if let Some(received_at) = request.received_at {
            active.received_at = Set(received_at);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, job_card_id = %id, "Failed to update job card");
            ServiceError::DatabaseError(e)
        })?;

        info!(job_card_id = %id, "Job card updated");
        self.emit(Event::JobCardUpdated(id)).await;

        Ok(updated)
    }

    /// Moves a job card to any workshop stage. Transitions are freely
    /// settable.
    #[instrument(skip(self, request), fields(new_status = %request.status))]
    pub async fn set_status(
        &self,
        id: Uuid,
        request: SetJobStatusRequest,
    ) -> Result<job_card::Model, ServiceError> {
        let db = &*self.db_pool;
        let existing = self.get_job_card(id).await?;
        let old_status = existing.status;

        let mut active: job_card::ActiveModel = existing.into();
        active.status = Set(request.status);
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, job_card_id = %id, "Failed to update job card status");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            job_card_id = %id,
            old_status = %old_status,
            new_status = %updated.status,
            "Job card status set"
        );
        self.emit(Event::JobCardStatusChanged {
            job_card_id: id,
            old_status,
            new_status: updated.status,
        })
        .await;

        Ok(updated)
    }

    /// Deletes a job card; notes, inspection report and quotations cascade.
    #[instrument(skip(self))]
    pub async fn delete_job_card(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = job_card::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Job card {id} not found")));
        }

        info!(job_card_id = %id, "Job card deleted");
        self.emit(Event::JobCardDeleted(id)).await;

        Ok(())
    }

    /// Appends a workshop note to the job card.
    #[instrument(skip(self, request))]
    pub async fn add_note(
        &self,
        job_card_id: Uuid,
        request: AddJobNoteRequest,
    ) -> Result<job_note::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        self.get_job_card(job_card_id).await?;

        let note = job_note::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_card_id: Set(job_card_id),
            note: Set(request.note),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(job_card_id = %job_card_id, note_id = %note.id, "Job note added");
        self.emit(Event::JobNoteAdded {
            job_card_id,
            note_id: note.id,
        })
        .await;

        Ok(note)
    }

    /// Job-card counts per workshop stage.
    #[instrument(skip(self))]
    pub async fn status_counts(&self) -> Result<Vec<StatusCount>, ServiceError> {
        let db = &*self.db_pool;

        let mut counts = Vec::new();
        for status in <JobStatus as sea_orm::Iterable>::iter() {
            let count = job_card::Entity::find()
                .filter(job_card::Column::Status.eq(status))
                .count(db)
                .await?;
            counts.push(StatusCount { status, count });
        }

        Ok(counts)
    }

    /// Notes for a job card, oldest first.
    #[instrument(skip(self))]
    pub async fn list_notes(&self, job_card_id: Uuid) -> Result<Vec<job_note::Model>, ServiceError> {
        let db = &*self.db_pool;
        self.get_job_card(job_card_id).await?;

        let notes = job_note::Entity::find()
            .filter(job_note::Column::JobCardId.eq(job_card_id))
            .order_by_asc(job_note::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(notes)
    }
}

/// Matches a customer by (name, phone), creating one with the optional
/// detail fields when absent. The pair is the intake identity; details
/// of an existing customer are left untouched.
async fn get_or_create_customer<C: ConnectionTrait>(
    conn: &C,
    request: &JobCardIntakeRequest,
) -> Result<customer::Model, ServiceError> {
    let existing = customer::Entity::find()
        .filter(customer::Column::Name.eq(request.customer_name.clone()))
        .filter(customer::Column::Phone.eq(request.customer_phone.clone()))
        .one(conn)
        .await?;

    if let Some(found) = existing {
        return Ok(found);
    }

    let model = customer::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(request.customer_name.clone()),
        phone: Set(request.customer_phone.clone()),
        email: Set(request.customer_email.clone()),
        company: Set(request.customer_company.clone()),
        trn: Set(request.customer_trn.clone()),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(conn)
    .await?;

    Ok(model)
}

/// Generates `JC{yymmdd}-{NN}` where NN is one past the count of job
/// cards already numbered that day. Runs on the caller's transaction;
/// the unique key on the column backstops races.
pub async fn next_job_number<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
) -> Result<String, ServiceError> {
    let day_prefix = format!("JC{}", now.format("%y%m%d"));

    let issued_today = job_card::Entity::find()
        .filter(job_card::Column::JobNumber.starts_with(day_prefix.as_str()))
        .count(conn)
        .await?;

    Ok(format!("{day_prefix}-{:02}", issued_today + 1))
}
