use crate::{
    db::DbPool,
    entities::vehicle,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateVehicleRequest {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50, message = "Make is required"))]
    pub make: String,
    #[validate(length(min = 1, max = 50, message = "Model is required"))]
    pub model: String,
    #[validate(length(min = 1, max = 30, message = "Color is required"))]
    pub color: String,
    #[validate(range(min = 1900, max = 2100, message = "Year must be plausible"))]
    pub year: i32,
    #[validate(length(min = 1, max = 20, message = "Plate is required"))]
    pub plate: String,
    #[validate(length(max = 17, message = "VIN must be at most 17 characters"))]
    pub vin: Option<String>,
    pub mileage: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateVehicleRequest {
    pub customer_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50, message = "Make is required"))]
    pub make: String,
    #[validate(length(min = 1, max = 50, message = "Model is required"))]
    pub model: String,
    #[validate(length(min = 1, max = 30, message = "Color is required"))]
    pub color: String,
    #[validate(range(min = 1900, max = 2100, message = "Year must be plausible"))]
    pub year: i32,
    #[validate(length(min = 1, max = 20, message = "Plate is required"))]
    pub plate: String,
    #[validate(length(max = 17, message = "VIN must be at most 17 characters"))]
    pub vin: Option<String>,
    pub mileage: Option<i32>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VehicleListResponse {
    pub vehicles: Vec<vehicle::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service for managing vehicles.
#[derive(Clone)]
pub struct VehicleService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl VehicleService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send vehicle event");
            }
        }
    }

    /// Creates a vehicle. A duplicate plate surfaces as a conflict.
    #[instrument(skip(self, request), fields(plate = %request.plate))]
    pub async fn create_vehicle(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<vehicle::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let existing = vehicle::Entity::find()
            .filter(vehicle::Column::Plate.eq(request.plate.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "A vehicle with plate {} already exists",
                request.plate
            )));
        }

        let id = Uuid::new_v4();
        let model = vehicle::ActiveModel {
            id: Set(id),
            customer_id: Set(request.customer_id),
            make: Set(request.make),
            model: Set(request.model),
            color: Set(request.color),
            year: Set(request.year),
            plate: Set(request.plate),
            vin: Set(request.vin),
            mileage: Set(request.mileage),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, vehicle_id = %id, "Failed to create vehicle");
            ServiceError::DatabaseError(e)
        })?;

        info!(vehicle_id = %id, plate = %model.plate, "Vehicle created");
        self.emit(Event::VehicleCreated(id)).await;

        Ok(model)
    }

    /// Fetches a vehicle by id; errors when missing.
    #[instrument(skip(self))]
    pub async fn get_vehicle(&self, id: Uuid) -> Result<vehicle::Model, ServiceError> {
        let db = &*self.db_pool;
        vehicle::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vehicle {id} not found")))
    }

    /// Lists vehicles, newest first.
    #[instrument(skip(self))]
    pub async fn list_vehicles(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<VehicleListResponse, ServiceError> {
        let db = &*self.db_pool;

        let paginator = vehicle::Entity::find()
            .order_by_desc(vehicle::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let vehicles = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok(VehicleListResponse {
            vehicles,
            total,
            page,
            per_page,
        })
    }

    /// Updates an existing vehicle.
    #[instrument(skip(self, request))]
    pub async fn update_vehicle(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<vehicle::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let existing = self.get_vehicle(id).await?;

        // Plate stays unique across the fleet
        if existing.plate != request.plate {
            let clash = vehicle::Entity::find()
                .filter(vehicle::Column::Plate.eq(request.plate.clone()))
                .one(db)
                .await?;
            if clash.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "A vehicle with plate {} already exists",
                    request.plate
                )));
            }
        }

        let mut active: vehicle::ActiveModel = existing.into();
        active.customer_id = Set(request.customer_id);
        active.make = Set(request.make);
        active.model = Set(request.model);
        active.color = Set(request.color);
        active.year = Set(request.year);
        active.plate = Set(request.plate);
        active.vin = Set(request.vin);
        active.mileage = Set(request.mileage);
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, vehicle_id = %id, "Failed to update vehicle");
            ServiceError::DatabaseError(e)
        })?;

        info!(vehicle_id = %id, "Vehicle updated");
        self.emit(Event::VehicleUpdated(id)).await;

        Ok(updated)
    }

    /// Deletes a vehicle; its job cards cascade.
    #[instrument(skip(self))]
    pub async fn delete_vehicle(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = vehicle::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Vehicle {id} not found")));
        }

        info!(vehicle_id = %id, "Vehicle deleted");
        self.emit(Event::VehicleDeleted(id)).await;

        Ok(())
    }
}

/// Looks a vehicle up by plate, creating it when absent. An existing
/// vehicle is reused as-is; if it has no owner it is claimed for
/// `customer_id`. Runs on the caller's connection so intake can wrap it
/// in a transaction.
pub async fn get_or_create_by_plate<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
    request: &CreateVehicleRequest,
) -> Result<vehicle::Model, ServiceError> {
    let existing = vehicle::Entity::find()
        .filter(vehicle::Column::Plate.eq(request.plate.clone()))
        .one(conn)
        .await?;

    if let Some(found) = existing {
        if found.customer_id.is_none() {
            let mut active: vehicle::ActiveModel = found.into();
            active.customer_id = Set(Some(customer_id));
            active.updated_at = Set(Some(Utc::now()));
            let claimed = active.update(conn).await?;
            return Ok(claimed);
        }
        return Ok(found);
    }

    let model = vehicle::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(Some(customer_id)),
        make: Set(request.make.clone()),
        model: Set(request.model.clone()),
        color: Set(request.color.clone()),
        year: Set(request.year),
        plate: Set(request.plate.clone()),
        vin: Set(request.vin.clone()),
        mileage: Set(request.mileage),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(conn)
    .await?;

    Ok(model)
}
