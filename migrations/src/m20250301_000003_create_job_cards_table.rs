use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_customers_table::Customers;
use crate::m20250301_000002_create_vehicles_table::Vehicles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobCards::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobCards::JobNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(JobCards::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(JobCards::VehicleId).uuid().not_null())
                    .col(
                        ColumnDef::new(JobCards::Status)
                            .string()
                            .not_null()
                            .default("under_inspection"),
                    )
                    .col(ColumnDef::new(JobCards::CustomerComments).text().null())
                    .col(ColumnDef::new(JobCards::WorkshopComments).text().null())
                    .col(ColumnDef::new(JobCards::RequiredJobs).text().null())
                    .col(ColumnDef::new(JobCards::ReceivedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(JobCards::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(JobCards::UpdatedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_cards_customer")
                            .from(JobCards::Table, JobCards::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_cards_vehicle")
                            .from(JobCards::Table, JobCards::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_cards_status")
                    .table(JobCards::Table)
                    .col(JobCards::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobNotes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobNotes::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobNotes::JobCardId).uuid().not_null())
                    .col(ColumnDef::new(JobNotes::Note).text().not_null())
                    .col(ColumnDef::new(JobNotes::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_notes_job_card")
                            .from(JobNotes::Table, JobNotes::JobCardId)
                            .to(JobCards::Table, JobCards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobNotes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobCards::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum JobCards {
    Table,
    Id,
    JobNumber,
    CustomerId,
    VehicleId,
    Status,
    CustomerComments,
    WorkshopComments,
    RequiredJobs,
    ReceivedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum JobNotes {
    Table,
    Id,
    JobCardId,
    Note,
    CreatedAt,
}
