use crate::{
    db::DbPool,
    entities::{
        customer,
        job_card::{self, JobStatus},
        quotation,
        quotation_item::{self, ItemType},
        vehicle,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
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
pub struct QuotationItemRequest {
    #[serde(default)]
    pub item_type: Option<ItemType>,
    #[validate(length(min = 1, max = 255, message = "Item description is required"))]
    pub description: String,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateQuotationRequest {
    pub vat_percentage: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
    #[validate]
    pub items: Vec<QuotationItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateQuotationRequest {
    pub vat_percentage: Decimal,
    pub discount_percentage: Decimal,
    /// Replaces the item set; omitted rows are deleted.
    #[validate]
    pub items: Vec<QuotationItemRequest>,
}

/// Derived money amounts; computed on read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuotationTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub vat_amount: Decimal,
    pub grand_total: Decimal,
}

impl QuotationTotals {
    /// subtotal        = Σ(quantity × unit_price)
    /// discount_amount = subtotal × discount% / 100
    /// vat_amount      = (subtotal − discount_amount) × vat% / 100
    /// grand_total     = subtotal − discount_amount + vat_amount
    ///
    /// Every step is quantized to 2 decimal places.
    pub fn compute(
        items: &[quotation_item::Model],
        discount_percentage: Decimal,
        vat_percentage: Decimal,
    ) -> Self {
        let hundred = dec!(100);

        let subtotal: Decimal = items
            .iter()
            .map(quotation_item::Model::line_total)
            .sum::<Decimal>()
            .round_dp(2);

        let discount_amount = (subtotal * discount_percentage / hundred).round_dp(2);
        let vat_amount = ((subtotal - discount_amount) * vat_percentage / hundred).round_dp(2);
        let grand_total = (subtotal - discount_amount + vat_amount).round_dp(2);

        Self {
            subtotal,
            discount_amount,
            vat_amount,
            grand_total,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QuotationDetail {
    #[serde(flatten)]
    pub quotation: quotation::Model,
    pub items: Vec<quotation_item::Model>,
    pub totals: QuotationTotals,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct QuotationListResponse {
    pub quotations: Vec<QuotationDetail>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Everything the PDF renderer needs for one quotation.
#[derive(Debug)]
pub struct QuotationDocument {
    pub quotation: quotation::Model,
    pub items: Vec<quotation_item::Model>,
    pub totals: QuotationTotals,
    pub job_card: job_card::Model,
    pub customer: customer::Model,
    pub vehicle: vehicle::Model,
}

/// Service for managing quotations and their derived totals.
#[derive(Clone)]
pub struct QuotationService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl QuotationService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "Failed to send quotation event");
            }
        }
    }

    /// Issues a quotation for a job card, with its item rows, in one
    /// transaction.
    #[instrument(skip(self, request), fields(job_card_id = %job_card_id))]
    pub async fn create_quotation(
        &self,
        job_card_id: Uuid,
        request: CreateQuotationRequest,
    ) -> Result<QuotationDetail, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start quotation transaction");
            ServiceError::DatabaseError(e)
        })?;

        let card = job_card::Entity::find_by_id(job_card_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Job card {job_card_id} not found")))?;

        let id = Uuid::new_v4();
        let quotation_number = next_quotation_number(&txn, now).await?;

        let model = quotation::ActiveModel {
            id: Set(id),
            job_card_id: Set(card.id),
            quotation_number: Set(quotation_number),
            vat_percentage: Set(request.vat_percentage.unwrap_or(dec!(5.00))),
            discount_percentage: Set(request.discount_percentage.unwrap_or(dec!(0.00))),
            issued_on: Set(now.date_naive()),
            created_at: Set(now),
            updated_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, quotation_id = %id, "Failed to create quotation");
            ServiceError::DatabaseError(e)
        })?;

        let items = insert_items(&txn, id, &request.items).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, quotation_id = %id, "Failed to commit quotation transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            quotation_id = %id,
            quotation_number = %model.quotation_number,
            items = items.len(),
            "Quotation issued"
        );
        self.emit(Event::QuotationCreated {
            job_card_id: card.id,
            quotation_id: id,
            quotation_number: model.quotation_number.clone(),
        })
        .await;

        Ok(detail_from_parts(model, items))
    }

    /// Fetches a quotation with items and computed totals.
    #[instrument(skip(self))]
    pub async fn get_quotation(&self, id: Uuid) -> Result<QuotationDetail, ServiceError> {
        let db = &*self.db_pool;

        let model = quotation::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Quotation {id} not found")))?;

        let items = load_items(db, id).await?;
        Ok(detail_from_parts(model, items))
    }

    /// Lists quotations, newest first, each with items and totals.
    #[instrument(skip(self))]
    pub async fn list_quotations(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<QuotationListResponse, ServiceError> {
        let db = &*self.db_pool;

        let paginator = quotation::Entity::find()
            .order_by_desc(quotation::Column::CreatedAt)
            .paginate(db, per_page);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        let mut quotations = Vec::with_capacity(models.len());
        for model in models {
            let items = load_items(db, model.id).await?;
            quotations.push(detail_from_parts(model, items));
        }

        Ok(QuotationListResponse {
            quotations,
            total,
            page,
            per_page,
        })
    }

    /// Updates percentages and replaces the item set in one transaction.
    #[instrument(skip(self, request))]
    pub async fn update_quotation(
        &self,
        id: Uuid,
        request: UpdateQuotationRequest,
    ) -> Result<QuotationDetail, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start quotation update transaction");
            ServiceError::DatabaseError(e)
        })?;

        let existing = quotation::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Quotation {id} not found")))?;

        let mut active: quotation::ActiveModel = existing.into();
        active.vat_percentage = Set(request.vat_percentage);
        active.discount_percentage = Set(request.discount_percentage);
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await?;

        // Replace semantics: the submitted rows are the item set
        quotation_item::Entity::delete_many()
            .filter(quotation_item::Column::QuotationId.eq(id))
            .exec(&txn)
            .await?;
        let items = insert_items(&txn, id, &request.items).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, quotation_id = %id, "Failed to commit quotation update");
            ServiceError::DatabaseError(e)
        })?;

        info!(quotation_id = %id, items = items.len(), "Quotation updated");
        self.emit(Event::QuotationUpdated(id)).await;

        Ok(detail_from_parts(updated, items))
    }

    /// Deletes a quotation and its items.
    #[instrument(skip(self))]
    pub async fn delete_quotation(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = quotation::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Quotation {id} not found")));
        }

        info!(quotation_id = %id, "Quotation deleted");
        self.emit(Event::QuotationDeleted(id)).await;

        Ok(())
    }

    /// Active job cards that do not have a quotation yet, newest first.
    #[instrument(skip(self))]
    pub async fn eligible_job_cards(&self) -> Result<Vec<job_card::Model>, ServiceError> {
        let db = &*self.db_pool;

        let quoted: Vec<Uuid> = quotation::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|q| q.job_card_id)
            .collect();

        let mut query = job_card::Entity::find()
            .filter(job_card::Column::Status.is_not_in(JobStatus::completed_statuses()));
        if !quoted.is_empty() {
            query = query.filter(job_card::Column::Id.is_not_in(quoted));
        }

        let cards = query
            .order_by_desc(job_card::Column::ReceivedAt)
            .all(db)
            .await?;

        Ok(cards)
    }

    /// Assembles the full context the PDF renderer needs.
    #[instrument(skip(self))]
    pub async fn get_quotation_document(
        &self,
        id: Uuid,
    ) -> Result<QuotationDocument, ServiceError> {
        let db = &*self.db_pool;
        let detail = self.get_quotation(id).await?;

        let job_card = job_card::Entity::find_by_id(detail.quotation.job_card_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Quotation {id} references missing job card {}",
                    detail.quotation.job_card_id
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

        Ok(QuotationDocument {
            quotation: detail.quotation,
            items: detail.items,
            totals: detail.totals,
            job_card,
            customer,
            vehicle,
        })
    }
}

async fn load_items<C: ConnectionTrait>(
    conn: &C,
    quotation_id: Uuid,
) -> Result<Vec<quotation_item::Model>, ServiceError> {
    let items = quotation_item::Entity::find()
        .filter(quotation_item::Column::QuotationId.eq(quotation_id))
        .all(conn)
        .await?;
    Ok(items)
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    quotation_id: Uuid,
    requests: &[QuotationItemRequest],
) -> Result<Vec<quotation_item::Model>, ServiceError> {
    let mut items = Vec::with_capacity(requests.len());
    for item in requests {
        let inserted = quotation_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            quotation_id: Set(quotation_id),
            item_type: Set(item.item_type.unwrap_or(ItemType::Part)),
            description: Set(item.description.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
        }
        .insert(conn)
        .await?;
        items.push(inserted);
    }
    Ok(items)
}

fn detail_from_parts(model: quotation::Model, items: Vec<quotation_item::Model>) -> QuotationDetail {
    let totals = QuotationTotals::compute(&items, model.discount_percentage, model.vat_percentage);
    QuotationDetail {
        quotation: model,
        items,
        totals,
    }
}

/// Generates `Q{yymmdd}-{NN}` where NN is one past the count of
/// quotations already issued that day. The unique key on
/// `quotation_number` backstops concurrent creates.
pub async fn next_quotation_number<C: ConnectionTrait>(
    conn: &C,
    now: DateTime<Utc>,
) -> Result<String, ServiceError> {
    let day_prefix = format!("Q{}", now.format("%y%m%d"));

    let issued_today = quotation::Entity::find()
        .filter(quotation::Column::QuotationNumber.starts_with(day_prefix.as_str()))
        .count(conn)
        .await?;

    Ok(format!("{day_prefix}-{:02}", issued_today + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32, unit_price: Decimal) -> quotation_item::Model {
        quotation_item::Model {
            id: Uuid::new_v4(),
            quotation_id: Uuid::new_v4(),
            item_type: ItemType::Part,
            description: "item".to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn totals_follow_the_formula() {
        let items = vec![item(2, dec!(100.00)), item(1, dec!(50.00))];
        let totals = QuotationTotals::compute(&items, dec!(10.00), dec!(5.00));

        assert_eq!(totals.subtotal, dec!(250.00));
        assert_eq!(totals.discount_amount, dec!(25.00));
        assert_eq!(totals.vat_amount, dec!(11.25));
        assert_eq!(totals.grand_total, dec!(236.25));
    }

    #[test]
    fn totals_with_no_items_are_zero() {
        let totals = QuotationTotals::compute(&[], dec!(0.00), dec!(5.00));
        assert_eq!(totals.subtotal, dec!(0.00));
        assert_eq!(totals.discount_amount, dec!(0.00));
        assert_eq!(totals.vat_amount, dec!(0.00));
        assert_eq!(totals.grand_total, dec!(0.00));
    }

    #[test]
    fn fractional_amounts_quantize_to_cents() {
        // 3 × 33.333 = 99.999 → 100.00 after line rounding (99.999 → 100.00)
        let items = vec![item(3, dec!(33.333))];
        let totals = QuotationTotals::compute(&items, dec!(0.00), dec!(5.00));

        assert_eq!(totals.subtotal, dec!(100.00));
        assert_eq!(totals.vat_amount, dec!(5.00));
        assert_eq!(totals.grand_total, dec!(105.00));
    }
}
