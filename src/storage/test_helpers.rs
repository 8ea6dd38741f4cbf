//! Shared test helpers for storage module tests.

use sqlx::sqlite::SqlitePoolOptions;

use super::SqliteDomainTable;

/// Creates an in-memory domain table with migrations applied.
///
/// The pool is capped at one connection so every query sees the same
/// in-memory database.
pub async fn create_test_table() -> SqliteDomainTable {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    SqliteDomainTable::from_pool(pool)
        .await
        .expect("Failed to run migrations")
}
