//! Import statistics tracking.
//!
//! This module provides thread-safe counters for failures encountered while
//! importing log files.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ImportErrorType;

/// Thread-safe import statistics tracker.
///
/// Every [`ImportErrorType`] is initialized to zero on creation, so counters
/// can be incremented from any task through a shared reference.
pub struct ImportStats {
    errors: HashMap<ImportErrorType, AtomicUsize>,
}

impl ImportStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ImportErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        ImportStats { errors }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, error: ImportErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map",
                error
            );
        }
    }

    /// Get the count for an error type.
    pub fn get_error_count(&self, error: ImportErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total number of errors across all categories.
    pub fn total_errors(&self) -> usize {
        self.errors.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }
}

impl Default for ImportStats {
    fn default() -> Self {
        Self::new()
    }
}
