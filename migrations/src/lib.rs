pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_customers_table;
mod m20250301_000002_create_vehicles_table;
mod m20250301_000003_create_job_cards_table;
mod m20250301_000004_create_inspection_tables;
mod m20250301_000005_create_quotation_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_customers_table::Migration),
            Box::new(m20250301_000002_create_vehicles_table::Migration),
            Box::new(m20250301_000003_create_job_cards_table::Migration),
            Box::new(m20250301_000004_create_inspection_tables::Migration),
            Box::new(m20250301_000005_create_quotation_tables::Migration),
        ]
    }
}
