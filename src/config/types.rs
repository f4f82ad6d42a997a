//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DB_PATH, DB_PATH_ENV};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// ```bash
/// # Seed the default database from a file
/// url_frontier urls.txt
///
/// # Custom database, print every queue event as JSON
/// url_frontier urls.txt --db-path ./crawl.db --log-events
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "url_frontier",
    about = "Seeds a crawl frontier from a list of URLs and reports queue counts."
)]
pub struct Opt {
    /// File to read URLs from ("-" for stdin)
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Database path (SQLite file). Falls back to URL_FRONTIER_DB_PATH, then ./url_frontier.db
    #[arg(long, value_parser)]
    pub db_path: Option<PathBuf>,

    /// Crawl level recorded for every URL read from the file
    #[arg(long, default_value_t = 0)]
    pub level: u32,

    /// Print every queued/dequeued event as a JSON line on stdout
    #[arg(long)]
    pub log_events: bool,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use url_frontier::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("urls.txt"),
///     log_events: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read URLs from
    pub file: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    pub db_path: PathBuf,

    /// Crawl level for seeded URLs
    pub level: u32,

    /// Echo queue events as JSON lines
    pub log_events: bool,
}

impl Config {
    /// Database path from the environment, or the built-in default.
    pub fn default_db_path() -> PathBuf {
        std::env::var(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DB_PATH))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("urls.txt"),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: Config::default_db_path(),
            level: 0,
            log_events: false,
        }
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Config {
            file: opt.file,
            log_level: opt.log_level,
            log_format: opt.log_format,
            db_path: opt.db_path.unwrap_or_else(Config::default_db_path),
            level: opt.level,
            log_events: opt.log_events,
        }
    }
}
