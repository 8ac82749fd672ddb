use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workshop stages a vehicle moves through. Transitions are freely
/// settable; the stages carry no state-machine constraint.
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
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    #[sea_orm(string_value = "under_inspection")]
    UnderInspection,
    #[sea_orm(string_value = "inspection_completed")]
    InspectionCompleted,
    #[sea_orm(string_value = "parts_sourcing")]
    PartsSourcing,
    #[sea_orm(string_value = "quote_issued")]
    QuoteIssued,
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    #[sea_orm(string_value = "waiting_parts")]
    WaitingParts,
    #[sea_orm(string_value = "work_in_progress")]
    WorkInProgress,
    #[sea_orm(string_value = "work_completed")]
    WorkCompleted,
    #[sea_orm(string_value = "under_testing")]
    UnderTesting,
    #[sea_orm(string_value = "ready_washing")]
    ReadyWashing,
    #[sea_orm(string_value = "ready_collection")]
    ReadyCollection,
    #[sea_orm(string_value = "delivered")]
    Delivered,
}

impl JobStatus {
    /// A job card stays on the active board until the vehicle is waiting
    /// for collection or gone.
    pub fn is_active(&self) -> bool {
        !matches!(self, JobStatus::ReadyCollection | JobStatus::Delivered)
    }

    /// Statuses that take a card off the active board.
    pub fn completed_statuses() -> [JobStatus; 2] {
        [JobStatus::ReadyCollection, JobStatus::Delivered]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = JobCard)]
#[sea_orm(table_name = "job_cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub job_number: String,

    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub status: JobStatus,
    pub customer_comments: Option<String>,
    pub workshop_comments: Option<String>,
    pub required_jobs: Option<String>,

    /// When the vehicle was received at the workshop.
    pub received_at: DateTime<Utc>,

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
    #[sea_orm(
        belongs_to = "super::vehicle::Entity",
        from = "Column::VehicleId",
        to = "super::vehicle::Column::Id"
    )]
    Vehicle,
    #[sea_orm(has_many = "super::job_note::Entity")]
    JobNotes,
    #[sea_orm(has_many = "super::quotation::Entity")]
    Quotations,
    #[sea_orm(has_one = "super::inspection_report::Entity")]
    InspectionReport,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::vehicle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl Related<super::job_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobNotes.def()
    }
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl Related<super::inspection_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InspectionReport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Seed text for a quotation item when none is provided.
    pub fn default_quotation_description(&self) -> String {
        let mut parts = Vec::new();
        if let Some(jobs) = self.required_jobs.as_deref().filter(|s| !s.is_empty()) {
            parts.push(jobs.to_string());
        }
        if let Some(notes) = self.workshop_comments.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("Workshop notes: {notes}"));
        }
        if parts.is_empty() {
            "Vehicle service and maintenance".to_string()
        } else {
            parts.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JobStatus;

    #[test]
    fn active_flag_follows_collection_boundary() {
        assert!(JobStatus::UnderInspection.is_active());
        assert!(JobStatus::WorkCompleted.is_active());
        assert!(!JobStatus::ReadyCollection.is_active());
        assert!(!JobStatus::Delivered.is_active());
    }

    #[test]
    fn status_round_trips_through_strings() {
        let status: JobStatus = "waiting_parts".parse().unwrap();
        assert_eq!(status, JobStatus::WaitingParts);
        assert_eq!(status.to_string(), "waiting_parts");
    }
}
