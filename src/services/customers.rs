use crate::{
    db::DbPool,
    entities::{customer, vehicle},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Phone is required"))]
    pub phone: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,
    pub company: Option<String>,
    pub trn: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Phone is required"))]
    pub phone: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,
    pub company: Option<String>,
    pub trn: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CustomerListResponse {
    pub customers: Vec<customer::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Service for managing customers.
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl CustomerService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send customer event");
            }
        }
    }

    /// Creates a new customer.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<customer::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let id = Uuid::new_v4();

        let model = customer::ActiveModel {
            id: Set(id),
            name: Set(request.name),
            phone: Set(request.phone),
            email: Set(request.email),
            company: Set(request.company),
            trn: Set(request.trn),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, customer_id = %id, "Failed to create customer");
            ServiceError::DatabaseError(e)
        })?;

        info!(customer_id = %id, "Customer created");
        self.emit(Event::CustomerCreated(id)).await;

        Ok(model)
    }

    /// Fetches a customer by id; errors when missing.
    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: Uuid) -> Result<customer::Model, ServiceError> {
        let db = &*self.db_pool;
        customer::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {id} not found")))
    }

    /// Lists customers, newest first.
    #[instrument(skip(self))]
    pub async fn list_customers(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<CustomerListResponse, ServiceError> {
        let db = &*self.db_pool;

        let paginator = customer::Entity::find()
            .order_by_desc(customer::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let customers = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok(CustomerListResponse {
            customers,
            total,
            page,
            per_page,
        })
    }

    /// Updates an existing customer.
    #[instrument(skip(self, request))]
    pub async fn update_customer(
        &self,
        id: Uuid,
        request: UpdateCustomerRequest,
    ) -> Result<customer::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let existing = self.get_customer(id).await?;

        let mut active: customer::ActiveModel = existing.into();
        active.name = Set(request.name);
        active.phone = Set(request.phone);
        active.email = Set(request.email);
        active.company = Set(request.company);
        active.trn = Set(request.trn);
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, customer_id = %id, "Failed to update customer");
            ServiceError::DatabaseError(e)
        })?;

        info!(customer_id = %id, "Customer updated");
        self.emit(Event::CustomerUpdated(id)).await;

        Ok(updated)
    }

    /// Deletes a customer; owned vehicles and job cards cascade.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = customer::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Customer {id} not found")));
        }

        info!(customer_id = %id, "Customer deleted");
        self.emit(Event::CustomerDeleted(id)).await;

        Ok(())
    }

    /// Vehicles owned by the customer.
    #[instrument(skip(self))]
    pub async fn get_customer_vehicles(
        &self,
        id: Uuid,
    ) -> Result<Vec<vehicle::Model>, ServiceError> {
        let db = &*self.db_pool;

        // Surface a 404 rather than an empty list for unknown customers
        self.get_customer(id).await?;

        let vehicles = vehicle::Entity::find()
            .filter(vehicle::Column::CustomerId.eq(id))
            .order_by_desc(vehicle::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(vehicles)
    }
}
