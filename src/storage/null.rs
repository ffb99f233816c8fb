//! Backend that discards everything.

use async_trait::async_trait;

use crate::error_handling::BackendError;
use crate::storage::backend::{Backend, BulkItem, BulkReport};

/// Accepts every batch and stores nothing. Useful for benchmarking the
/// decode and enrichment path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

#[async_trait]
impl Backend for NullBackend {
    async fn open_or_create(&self, _destination: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn write_batch(&self, items: Vec<BulkItem>) -> Result<BulkReport, BackendError> {
        Ok(BulkReport::success(items.len()))
    }

    async fn delete_matching(&self, _pattern: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
