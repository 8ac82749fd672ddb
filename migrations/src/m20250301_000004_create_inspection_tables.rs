use sea_orm_migration::prelude::*;

use crate::m20250301_000003_create_job_cards_table::JobCards;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One report per job card, enforced by the unique key
        manager
            .create_table(
                Table::create()
                    .table(InspectionReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InspectionReports::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InspectionReports::JobCardId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(InspectionReports::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InspectionReports::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inspection_reports_job_card")
                            .from(InspectionReports::Table, InspectionReports::JobCardId)
                            .to(JobCards::Table, JobCards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InspectionFindings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InspectionFindings::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InspectionFindings::ReportId).uuid().not_null())
                    .col(
                        ColumnDef::new(InspectionFindings::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InspectionFindings::Severity)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(InspectionFindings::EstimatedHours)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(ColumnDef::new(InspectionFindings::Remarks).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inspection_findings_report")
                            .from(InspectionFindings::Table, InspectionFindings::ReportId)
                            .to(InspectionReports::Table, InspectionReports::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RequiredParts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequiredParts::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RequiredParts::FindingId).uuid().not_null())
                    .col(ColumnDef::new(RequiredParts::PartNumber).string().null())
                    .col(
                        ColumnDef::new(RequiredParts::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequiredParts::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(RequiredParts::Status)
                            .string()
                            .not_null()
                            .default("required"),
                    )
                    .col(ColumnDef::new(RequiredParts::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_required_parts_finding")
                            .from(RequiredParts::Table, RequiredParts::FindingId)
                            .to(InspectionFindings::Table, InspectionFindings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RequiredConsumables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequiredConsumables::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequiredConsumables::FindingId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RequiredConsumables::Name).string().not_null())
                    .col(
                        ColumnDef::new(RequiredConsumables::Quantity)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(
                        ColumnDef::new(RequiredConsumables::Unit)
                            .string()
                            .not_null()
                            .default("pcs"),
                    )
                    .col(ColumnDef::new(RequiredConsumables::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_required_consumables_finding")
                            .from(RequiredConsumables::Table, RequiredConsumables::FindingId)
                            .to(InspectionFindings::Table, InspectionFindings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RequiredConsumables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RequiredParts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InspectionFindings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InspectionReports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum InspectionReports {
    Table,
    Id,
    JobCardId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum InspectionFindings {
    Table,
    Id,
    ReportId,
    Description,
    Severity,
    EstimatedHours,
    Remarks,
}

#[derive(DeriveIden)]
pub enum RequiredParts {
    Table,
    Id,
    FindingId,
    PartNumber,
    Description,
    Quantity,
    Status,
    Notes,
}

#[derive(DeriveIden)]
pub enum RequiredConsumables {
    Table,
    Id,
    FindingId,
    Name,
    Quantity,
    Unit,
    Notes,
}
