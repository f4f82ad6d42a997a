// storage/mod.rs
// URL store contract and implementations

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod sqlite;
#[cfg(test)]
pub mod test_helpers;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error_handling::StoreError;
use crate::models::{AddUrlInfo, RecordUpdate, Status, UrlRecord, UrlResult, Visit};

// Re-export commonly used items
pub use memory::MemoryUrlStore;
pub use migrations::run_migrations;
pub use pool::{init_db_pool_with_path, init_memory_pool, DbPool};
pub use sqlite::SqliteUrlStore;

/// Persistent table of URL records.
///
/// Implementations own record selection atomicity: two concurrent
/// `check_out` calls must never lease the same record.
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Number of records in the store.
    async fn count(&self) -> Result<usize, StoreError>;

    /// Looks up a single record.
    async fn get_one(&self, url: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Streams every record in insertion order.
    ///
    /// Each call starts a fresh stream.
    fn get_all(&self) -> BoxStream<'_, Result<UrlRecord, StoreError>>;

    /// Inserts URLs not yet present with status `Queued`.
    ///
    /// Returns the URLs actually inserted, in input order. Duplicates, whether
    /// already stored or repeated within `urls`, are skipped.
    async fn add_many(&self, urls: Vec<AddUrlInfo>) -> Result<Vec<String>, StoreError>;

    /// Leases the earliest inserted record with `filter_status` (and a level
    /// strictly below `filter_level`, if given), marking it `InProgress`.
    ///
    /// Fails with [`StoreError::QueueEmpty`] when nothing is eligible.
    async fn check_out(
        &self,
        filter_status: Status,
        filter_level: Option<u32>,
    ) -> Result<UrlRecord, StoreError>;

    /// Writes the outcome of a leased record.
    async fn check_in(
        &self,
        url: &str,
        new_status: Status,
        increment_try_count: bool,
        url_result: Option<UrlResult>,
    ) -> Result<(), StoreError>;

    /// Applies a partial update to one record.
    async fn update_one(&self, url: &str, update: RecordUpdate) -> Result<(), StoreError>;

    /// Puts every `InProgress` record back to `Queued`.
    async fn release(&self) -> Result<(), StoreError>;

    /// Deletes records. Unknown URLs are ignored.
    async fn remove_many(&self, urls: &[String]) -> Result<(), StoreError>;

    /// Releases underlying resources.
    async fn close(&self) -> Result<(), StoreError>;

    /// Records WARC visits for revisit lookups.
    async fn add_visits(&self, visits: Vec<Visit>) -> Result<(), StoreError>;

    /// WARC record ID of an earlier visit with the same URL and payload digest.
    async fn get_revisit_id(
        &self,
        url: &str,
        payload_digest: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Distinct hostnames of stored URLs, sorted.
    async fn get_hostnames(&self) -> Result<Vec<String>, StoreError>;
}
