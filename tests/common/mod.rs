//! Shared fixture: a migrated SQLite database backed by a temp file.
//! A file (rather than `sqlite::memory:`) keeps the schema visible to
//! every pooled connection.

use migrations::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use tempfile::NamedTempFile;

pub struct TestDb {
    pub db: Arc<DatabaseConnection>,
    // Deleted with the fixture
    _file: NamedTempFile,
}

pub async fn setup_db() -> TestDb {
    let file = NamedTempFile::new().expect("failed to create temp database file");
    let url = format!("sqlite://{}?mode=rwc", file.path().display());

    let db = Database::connect(&url)
        .await
        .expect("failed to open test database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");

    TestDb {
        db: Arc::new(db),
        _file: file,
    }
}
