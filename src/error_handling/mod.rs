//! Error handling.
//!
//! Errors are split by who sees them:
//! - **Store errors** reach the caller of every wrapped store operation unchanged
//! - **URL parse errors** are logged and swallowed by the frontier
//! - **Hook errors** are only visible to code attaching hooks or listeners

mod types;

// Re-export public API
pub use types::{HookError, InitializationError, StoreError, UrlParseError};
