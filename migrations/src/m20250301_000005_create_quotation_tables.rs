use sea_orm_migration::prelude::*;

use crate::m20250301_000003_create_job_cards_table::JobCards;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Quotations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Quotations::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Quotations::JobCardId).uuid().not_null())
                    .col(
                        ColumnDef::new(Quotations::QuotationNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Quotations::VatPercentage)
                            .decimal()
                            .not_null()
                            .default(5.0),
                    )
                    .col(
                        ColumnDef::new(Quotations::DiscountPercentage)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Quotations::IssuedOn).date().not_null())
                    .col(ColumnDef::new(Quotations::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Quotations::UpdatedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotations_job_card")
                            .from(Quotations::Table, Quotations::JobCardId)
                            .to(JobCards::Table, JobCards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_quotations_job_card")
                    .table(Quotations::Table)
                    .col(Quotations::JobCardId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(QuotationItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuotationItems::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuotationItems::QuotationId).uuid().not_null())
                    .col(
                        ColumnDef::new(QuotationItems::ItemType)
                            .string()
                            .not_null()
                            .default("part"),
                    )
                    .col(
                        ColumnDef::new(QuotationItems::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuotationItems::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(QuotationItems::UnitPrice)
                            .decimal()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotation_items_quotation")
                            .from(QuotationItems::Table, QuotationItems::QuotationId)
                            .to(Quotations::Table, Quotations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuotationItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quotations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Quotations {
    Table,
    Id,
    JobCardId,
    QuotationNumber,
    VatPercentage,
    DiscountPercentage,
    IssuedOn,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum QuotationItems {
    Table,
    Id,
    QuotationId,
    ItemType,
    Description,
    Quantity,
    UnitPrice,
}
