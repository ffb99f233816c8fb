//! Batch sink configuration.

use crate::config::{DEFAULT_FLUSH_THRESHOLD, DEFAULT_INDEX_BASE, DEFAULT_QUEUE_CAPACITY};
use crate::error_handling::InitializationError;

/// Configuration for a [`super::BatchSink`].
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Prefix of every destination name (`<base>-YYYY-MM-DD`)
    pub destination_base: String,
    /// Records that can be queued before `submit` blocks
    pub queue_capacity: usize,
    /// Number of records written per backend batch
    pub flush_threshold: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            destination_base: DEFAULT_INDEX_BASE.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

impl SinkConfig {
    pub fn new(destination_base: impl Into<String>) -> Self {
        SinkConfig {
            destination_base: destination_base.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), InitializationError> {
        if self.destination_base.is_empty() {
            return Err(InitializationError::ConfigError(
                "destination base must not be empty".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(InitializationError::ConfigError(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if self.flush_threshold == 0 {
            return Err(InitializationError::ConfigError(
                "flush threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
