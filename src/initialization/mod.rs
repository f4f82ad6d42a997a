//! Process-level initialization.
//!
//! The library never installs a logger on its own; binaries and tests call
//! [`init_logger_with`] once at startup.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
