//! url_frontier library: crawl frontier bookkeeping on top of a URL store
//!
//! [`Frontier`] wraps any [`UrlStore`] and mirrors each queue transition
//! (add, check-out, error check-in) with a session queue counter and a
//! `queued` / `dequeued` event. Stores are provided for SQLite
//! ([`SqliteUrlStore`]) and process memory ([`MemoryUrlStore`]).
//!
//! # Example
//!
//! ```no_run
//! use url_frontier::{Frontier, MemoryUrlStore, Status, QUEUED_URL};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frontier = Frontier::new(MemoryUrlStore::new());
//! frontier
//!     .dispatcher()
//!     .add_listener(QUEUED_URL, |event| println!("queued {}", event.url_info().url))?;
//!
//! frontier.add_many(["http://example.com/"]).await?;
//! let record = frontier.check_out(Status::Queued, None).await?;
//! frontier.check_in(&record.url, Status::Done, true, None).await?;
//! assert_eq!(frontier.queue_count(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
pub mod error_handling;
pub mod frontier;
pub mod hook;
pub mod initialization;
pub mod models;
pub mod storage;
pub mod url_info;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Opt, DEQUEUED_URL, QUEUED_URL};
pub use error_handling::{HookError, InitializationError, StoreError, UrlParseError};
pub use frontier::Frontier;
pub use hook::{Dispatcher, EventDispatcher, FrontierEvent, Hook, ListenerId};
pub use models::{AddUrlInfo, RecordUpdate, Status, UrlRecord, UrlResult, Visit};
pub use run::{run_seed, SeedReport};
pub use storage::{MemoryUrlStore, SqliteUrlStore, UrlStore};
pub use url_info::UrlInfo;

// Internal run module (seeds the frontier from an input file)
mod run {
    use anyhow::{Context, Result};
    use log::{info, warn};
    use std::path::PathBuf;

    use crate::app::read_seed_urls;
    use crate::config::{Config, DEQUEUED_URL, QUEUED_URL};
    use crate::frontier::Frontier;
    use crate::hook::FrontierEvent;
    use crate::models::AddUrlInfo;
    use crate::storage::SqliteUrlStore;

    /// Results of a seeding run.
    #[derive(Debug, Clone)]
    pub struct SeedReport {
        /// URL lines read from the input
        pub read: usize,
        /// URLs newly inserted into the store
        pub added: usize,
        /// Records in the store after seeding
        pub total: usize,
        /// Session queue count after seeding
        pub queued: i64,
        /// Path to the SQLite database holding the frontier
        pub db_path: PathBuf,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Seeds the frontier database from `config.file`.
    ///
    /// Reads URLs, opens (and migrates) the SQLite store, and adds them through
    /// a [`Frontier`] at `config.level`. URLs already in the store are skipped.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The input file cannot be read
    /// - The database cannot be opened or migrated
    /// - The store rejects the insert
    ///
    /// # Example
    ///
    /// ```no_run
    /// use url_frontier::{run_seed, Config};
    /// use std::path::PathBuf;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config {
    ///     file: PathBuf::from("urls.txt"),
    ///     ..Default::default()
    /// };
    /// let report = run_seed(config).await?;
    /// println!("Queued {} URLs", report.queued);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_seed(config: Config) -> Result<SeedReport> {
        let start_time = std::time::Instant::now();

        let urls = read_seed_urls(&config.file).await?;
        let read = urls.len();
        info!("Total URLs in input: {read}");

        let store = SqliteUrlStore::open(&config.db_path)
            .await
            .context("Failed to open URL store")?;
        let frontier = Frontier::new(store);

        if config.log_events {
            for name in [QUEUED_URL, DEQUEUED_URL] {
                frontier
                    .dispatcher()
                    .add_listener(name, print_event)
                    .context("Failed to attach event printer")?;
            }
        }

        let level = config.level;
        let added = frontier
            .add_many(urls.into_iter().map(|url| AddUrlInfo {
                url,
                level,
                ..Default::default()
            }))
            .await
            .context("Failed to add URLs to the frontier")?;
        if added.len() < read {
            info!("Skipped {} URL(s) already in the store", read - added.len());
        }

        let total = frontier
            .count()
            .await
            .context("Failed to count stored URLs")?;

        if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(frontier.store().pool().as_ref())
            .await
        {
            warn!("Failed to checkpoint WAL file (this is non-critical): {e}");
        }
        frontier.close().await.context("Failed to close URL store")?;

        Ok(SeedReport {
            read,
            added: added.len(),
            total,
            queued: frontier.queue_count(),
            db_path: config.db_path,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        })
    }

    fn print_event(event: &FrontierEvent) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("Failed to serialize {} event: {e}", event.name()),
        }
    }
}
