//! Run-level reporting helpers used by the import driver.

pub mod statistics;

// Re-export public API
pub use statistics::{print_error_statistics, print_run_summary};
