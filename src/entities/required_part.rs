use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sourcing state of a part a finding calls for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PartStatus {
    #[sea_orm(string_value = "required")]
    Required,
    #[sea_orm(string_value = "ordered")]
    Ordered,
    #[sea_orm(string_value = "in_stock")]
    InStock,
    #[sea_orm(string_value = "installed")]
    Installed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = RequiredPart)]
#[sea_orm(table_name = "required_parts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub finding_id: Uuid,
    pub part_number: Option<String>,
    pub description: String,
    pub quantity: i32,
    pub status: PartStatus,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inspection_finding::Entity",
        from = "Column::FindingId",
        to = "super::inspection_finding::Column::Id"
    )]
    Finding,
}

impl Related<super::inspection_finding::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Finding.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
