//! Binary-side helpers.
//!
//! Reading seed URLs from a file or stdin.

pub mod input;

// Re-export public API
pub use input::read_seed_urls;
