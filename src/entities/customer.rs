use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate, utoipa::ToSchema)]
#[schema(as = Customer)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "Phone must be between 1 and 20 characters"))]
    pub phone: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    pub company: Option<String>,

    /// UAE Tax Registration Number
    pub trn: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vehicle::Entity")]
    Vehicles,
    #[sea_orm(has_many = "super::job_card::Entity")]
    JobCards,
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicles.def()
    }
}

impl Related<super::job_card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobCards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Name used on printed documents; companies bill under the company name.
    pub fn display_name(&self) -> &str {
        match self.company.as_deref() {
            Some(company) if !company.is_empty() => company,
            _ => &self.name,
        }
    }
}
