use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[schema(as = Vehicle)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owner; nullable so a walk-in vehicle can be recorded before its
    /// customer and claimed at intake.
    pub customer_id: Option<Uuid>,

    #[validate(length(min = 1, max = 50, message = "Make must be between 1 and 50 characters"))]
    pub make: String,

    #[validate(length(min = 1, max = 50, message = "Model must be between 1 and 50 characters"))]
    pub model: String,

    #[validate(length(min = 1, max = 30, message = "Color must be between 1 and 30 characters"))]
    pub color: String,

    #[validate(range(min = 1900, max = 2100, message = "Year must be plausible"))]
    pub year: i32,

    #[sea_orm(unique)]
    #[validate(length(min = 1, max = 20, message = "Plate must be between 1 and 20 characters"))]
    pub plate: String,

    #[validate(length(max = 17, message = "VIN must be at most 17 characters"))]
    pub vin: Option<String>,

    pub mileage: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    #[sea_orm(has_many = "super::job_card::Entity")]
    JobCards,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::job_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobCards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
