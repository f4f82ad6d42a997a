//! Error type definitions.
//!
//! This module defines the error types surfaced by the frontier, its stores,
//! the URL parser and the hook table.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors surfaced by a URL store.
///
/// The frontier never catches or rewrites these; whatever the store returns
/// reaches the caller unchanged.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record matches the check-out filter.
    #[error("No queued URL matches the check-out filter")]
    QueueEmpty,

    /// The URL is not present in the store.
    #[error("URL not found in store: {0}")]
    NotFound(String),

    /// The store has been closed.
    #[error("URL store is closed")]
    Closed,

    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreation(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be decoded into a record field.
    #[error("Corrupt record for {url}: {reason}")]
    CorruptRecord {
        /// URL of the offending row
        url: String,
        /// What could not be decoded
        reason: String,
    },
}

impl StoreError {
    /// Returns true when the error means "nothing to check out".
    pub fn is_queue_empty(&self) -> bool {
        matches!(self, StoreError::QueueEmpty)
    }
}

/// Reasons a raw URL string cannot become a [`crate::UrlInfo`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlParseError {
    /// Input was empty or whitespace only.
    #[error("URL is empty")]
    Empty,

    /// Input exceeds the maximum accepted length.
    #[error("URL exceeds maximum length ({len} > {max})")]
    TooLong {
        /// Length of the input
        len: usize,
        /// Maximum accepted length
        max: usize,
    },

    /// The `url` crate rejected the input.
    #[error("Invalid URL {url:?}: {source}")]
    Invalid {
        /// The (scheme-completed) input
        url: String,
        /// Parser failure
        #[source]
        source: url::ParseError,
    },

    /// Scheme other than http, https or ftp.
    #[error("Unsupported scheme {0:?}")]
    UnsupportedScheme(String),

    /// URL parsed but carries no host.
    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// Errors raised when attaching a hook or listener to a named event.
///
/// These are attach-time errors only; notifying an event never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// The hook declined to be attached to the event.
    #[error("Hook declined to attach to {0}")]
    Disconnected(String),

    /// The event already has an override hook attached.
    #[error("A hook is already connected to {0}")]
    AlreadyConnected(String),

    /// The event name was never registered.
    #[error("Unknown event {0}")]
    UnknownEvent(String),
}
