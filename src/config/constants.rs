//! Configuration constants.
//!
//! This module defines the defaults used by the frontier binary and the URL
//! parser.

/// Default SQLite database holding the frontier.
pub const DB_PATH: &str = "./url_frontier.db";

/// Environment variable overriding [`DB_PATH`].
pub const DB_PATH_ENV: &str = "URL_FRONTIER_DB_PATH";

/// Maximum URL length (2048 characters).
/// This matches common browser and server limits (e.g., IE, Apache, Nginx default limits).
pub const MAX_URL_LENGTH: usize = 2048;

/// Event fired after a URL enters the queue.
pub const QUEUED_URL: &str = "URLTable.queued_url";

/// Event fired after a URL is checked out of the queue.
pub const DEQUEUED_URL: &str = "URLTable.dequeued_url";
