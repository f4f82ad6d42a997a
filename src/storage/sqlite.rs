//! SQLite-backed URL store.
//!
//! Records live in the `queued_urls` table created by the migrations. Check-out
//! selects and leases a record in a single `UPDATE ... RETURNING` statement, so
//! concurrent callers never lease the same row.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use log::info;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error_handling::StoreError;
use crate::models::{AddUrlInfo, RecordUpdate, Status, UrlRecord, UrlResult, Visit};
use crate::storage::{init_db_pool_with_path, init_memory_pool, run_migrations, DbPool, UrlStore};
use crate::url_info::UrlInfo;

/// URL store persisted in SQLite.
pub struct SqliteUrlStore {
    pool: DbPool,
}

impl SqliteUrlStore {
    /// Wraps an existing pool. Migrations must already have run.
    pub fn new(pool: DbPool) -> Self {
        SqliteUrlStore { pool }
    }

    /// Opens (creating if needed) the database at `db_path` and migrates it.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let pool = init_db_pool_with_path(db_path).await?;
        run_migrations(&pool).await?;
        info!("URL store opened at {}", db_path.display());
        Ok(SqliteUrlStore { pool })
    }

    /// Opens a private in-memory database, migrated.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = init_memory_pool().await?;
        run_migrations(&pool).await?;
        Ok(SqliteUrlStore { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn record_from_row(row: &SqliteRow) -> Result<UrlRecord, StoreError> {
    let url: String = row.try_get("url")?;
    let status_text: String = row.try_get("status")?;
    let status = Status::from_str(&status_text).map_err(|_| StoreError::CorruptRecord {
        url: url.clone(),
        reason: format!("unknown status {status_text:?}"),
    })?;

    Ok(UrlRecord {
        url,
        status,
        try_count: row.try_get("try_count")?,
        level: row.try_get("level")?,
        top_url: row.try_get("top_url")?,
        parent_url: row.try_get("parent_url")?,
        root_url: row.try_get("root_url")?,
        status_code: row.try_get("status_code")?,
        inline: row.try_get("inline")?,
        link_type: row.try_get("link_type")?,
        post_data: row.try_get("post_data")?,
        filename: row.try_get("filename")?,
    })
}

#[async_trait]
impl UrlStore for SqliteUrlStore {
    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queued_urls")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count as usize)
    }

    async fn get_one(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query("SELECT * FROM queued_urls WHERE url = ?")
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(record_from_row).transpose()
    }

    fn get_all(&self) -> BoxStream<'_, Result<UrlRecord, StoreError>> {
        sqlx::query("SELECT * FROM queued_urls ORDER BY id")
            .fetch(self.pool.as_ref())
            .map(|row| {
                row.map_err(StoreError::from)
                    .and_then(|row| record_from_row(&row))
            })
            .boxed()
    }

    async fn add_many(&self, urls: Vec<AddUrlInfo>) -> Result<Vec<String>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut added = Vec::new();

        for info in urls {
            let hostname = UrlInfo::parse(&info.url).ok().map(|parsed| parsed.host);
            let result = sqlx::query(
                "INSERT OR IGNORE INTO queued_urls (
                    url, hostname, status, level, top_url, parent_url, root_url,
                    inline, link_type, post_data
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&info.url)
            .bind(hostname)
            .bind(Status::Queued.as_str())
            .bind(info.level)
            .bind(info.top_url.as_deref())
            .bind(info.parent_url.as_deref())
            .bind(info.root_url.as_deref())
            .bind(info.inline)
            .bind(info.link_type.as_deref())
            .bind(info.post_data.as_deref())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 1 {
                added.push(info.url);
            }
        }

        tx.commit().await?;
        Ok(added)
    }

    async fn check_out(
        &self,
        filter_status: Status,
        filter_level: Option<u32>,
    ) -> Result<UrlRecord, StoreError> {
        let row = match filter_level {
            Some(level) => {
                sqlx::query(
                    "UPDATE queued_urls SET status = ?
                     WHERE id = (
                         SELECT id FROM queued_urls
                         WHERE status = ? AND level < ?
                         ORDER BY id LIMIT 1
                     )
                     RETURNING *",
                )
                .bind(Status::InProgress.as_str())
                .bind(filter_status.as_str())
                .bind(level)
                .fetch_optional(self.pool.as_ref())
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE queued_urls SET status = ?
                     WHERE id = (
                         SELECT id FROM queued_urls
                         WHERE status = ?
                         ORDER BY id LIMIT 1
                     )
                     RETURNING *",
                )
                .bind(Status::InProgress.as_str())
                .bind(filter_status.as_str())
                .fetch_optional(self.pool.as_ref())
                .await?
            }
        };

        let row = row.ok_or(StoreError::QueueEmpty)?;
        record_from_row(&row)
    }

    async fn check_in(
        &self,
        url: &str,
        new_status: Status,
        increment_try_count: bool,
        url_result: Option<UrlResult>,
    ) -> Result<(), StoreError> {
        let (status_code, filename) = url_result
            .map(|result| (result.status_code, result.filename))
            .unwrap_or((None, None));

        let result = sqlx::query(
            "UPDATE queued_urls
             SET status = ?,
                 try_count = try_count + ?,
                 status_code = COALESCE(?, status_code),
                 filename = COALESCE(?, filename)
             WHERE url = ?",
        )
        .bind(new_status.as_str())
        .bind(i64::from(increment_try_count))
        .bind(status_code)
        .bind(filename)
        .bind(url)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(url.to_string()));
        }
        Ok(())
    }

    async fn update_one(&self, url: &str, update: RecordUpdate) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE queued_urls
             SET status = COALESCE(?, status),
                 try_count = COALESCE(?, try_count),
                 level = COALESCE(?, level),
                 status_code = COALESCE(?, status_code),
                 filename = COALESCE(?, filename),
                 link_type = COALESCE(?, link_type)
             WHERE url = ?",
        )
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.try_count)
        .bind(update.level)
        .bind(update.status_code)
        .bind(update.filename)
        .bind(update.link_type)
        .bind(url)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(url.to_string()));
        }
        Ok(())
    }

    async fn release(&self) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE queued_urls SET status = ? WHERE status = ?")
            .bind(Status::Queued.as_str())
            .bind(Status::InProgress.as_str())
            .execute(self.pool.as_ref())
            .await?;
        info!("Released {} in-progress URLs", result.rows_affected());
        Ok(())
    }

    async fn remove_many(&self, urls: &[String]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for url in urls {
            sqlx::query("DELETE FROM queued_urls WHERE url = ?")
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.pool.close().await;
        Ok(())
    }

    async fn add_visits(&self, visits: Vec<Visit>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for visit in visits {
            sqlx::query(
                "INSERT OR REPLACE INTO visits (url, warc_id, payload_digest) VALUES (?, ?, ?)",
            )
            .bind(visit.url)
            .bind(visit.warc_id)
            .bind(visit.payload_digest)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get_revisit_id(
        &self,
        url: &str,
        payload_digest: &str,
    ) -> Result<Option<String>, StoreError> {
        let warc_id = sqlx::query_scalar::<_, String>(
            "SELECT warc_id FROM visits WHERE url = ? AND payload_digest = ? LIMIT 1",
        )
        .bind(url)
        .bind(payload_digest)
        .fetch_optional(self.pool.as_ref())
        .await?;
        Ok(warc_id)
    }

    async fn get_hostnames(&self) -> Result<Vec<String>, StoreError> {
        let hostnames = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT hostname FROM queued_urls WHERE hostname IS NOT NULL ORDER BY hostname",
        )
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(hostnames)
    }
}
