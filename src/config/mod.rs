//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (queue sizes, defaults, timeouts)
//! - CLI option types and parsing
//! - The library-side `Config`

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{docker_link_host, Config, LogFormat, LogLevel, Opt};
