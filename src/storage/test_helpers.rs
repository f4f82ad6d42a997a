//! Shared test helpers for storage module tests.

use sqlx::SqlitePool;

use crate::storage::SqliteUrlStore;

/// Creates a migrated SQLite store over a private in-memory database.
pub async fn create_test_store() -> SqliteUrlStore {
    SqliteUrlStore::open_in_memory()
        .await
        .expect("Failed to create test URL store")
}

/// Inserts a row directly, bypassing the store (e.g. to plant bad data).
pub async fn insert_raw_record(pool: &SqlitePool, url: &str, status: &str) {
    sqlx::query("INSERT INTO queued_urls (url, status) VALUES (?, ?)")
        .bind(url)
        .bind(status)
        .execute(pool)
        .await
        .expect("Failed to insert raw URL record");
}
