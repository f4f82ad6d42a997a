//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (paths, limits, event names)
//! - CLI option types and parsing
//! - The library-level [`Config`]

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt};
