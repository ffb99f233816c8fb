//! Error handling and import statistics.
//!
//! This module provides:
//! - Error type definitions for decoding, storage, the batch sink and startup
//! - Import statistics tracking (failures per category)
//!
//! Errors fall into three groups:
//! - **Decode errors**: one log line, returned to the caller of the importer
//! - **Backend errors**: latched by the batch sink and terminal for it
//! - **Initialization errors**: fatal before any record is processed

mod stats;
mod types;

// Re-export public API
pub use stats::ImportStats;
pub use types::{
    BackendError, DecodeError, ImportError, ImportErrorType, InitializationError, SinkError,
};
