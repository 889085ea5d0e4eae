use ledgerfolio_core::db::{self, DbPool};
use std::sync::Arc;
use tempfile::TempDir;

/// Creates an isolated, migrated on-disk database for one test. The returned
/// directory guard must outlive every use of the pool.
pub fn setup_test_db() -> (TempDir, Arc<DbPool>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = db::init(dir.path().to_str().expect("Temp path is not valid UTF-8"))
        .expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");
    (dir, pool)
}
