//! Storage backend contract.
//!
//! A backend accepts batches of keyed documents, each addressed to a named
//! destination (an index, a file, ...). The batch sink is generic over this
//! trait; an Elasticsearch client, a JSON writer and a null backend are
//! provided.

use async_trait::async_trait;

use crate::error_handling::BackendError;

/// One document addressed to a destination under an external key.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItem {
    pub destination: String,
    pub key: String,
    pub document: serde_json::Value,
}

/// Outcome of a batch write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl BulkReport {
    /// A report where all `count` items were stored.
    pub fn success(count: usize) -> Self {
        Self {
            succeeded: count,
            failed: 0,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Capabilities the batch sink needs from durable storage.
///
/// Calls from one sink are strictly sequential: `write_batch` is never
/// invoked concurrently by the same sink.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Opens a named destination, creating it if needed.
    async fn open_or_create(&self, destination: &str) -> Result<(), BackendError>;

    /// Writes a batch of documents. Items with the same key overwrite each other.
    async fn write_batch(&self, items: Vec<BulkItem>) -> Result<BulkReport, BackendError>;

    /// Deletes every destination whose name matches `pattern` (`*` wildcard).
    async fn delete_matching(&self, pattern: &str) -> Result<(), BackendError>;

    /// Releases held resources. Called once, after the last write.
    async fn close(&self) -> Result<(), BackendError>;
}
