//! Background flush task.
//!
//! A single task owns the receiving end of the queue, accumulates records
//! and writes full batches synchronously before dequeuing again. On the
//! first backend failure it records the sticky error and returns, dropping
//! the receiver so blocked producers wake up.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error_handling::{BackendError, SinkError};
use crate::record::Record;
use crate::storage::backend::{Backend, BulkItem, BulkReport};

use super::sticky::StickyError;

/// Batch writer that collects records and writes them in batches
pub(crate) struct BatchWorker {
    backend: Arc<dyn Backend>,
    destination_base: String,
    flush_threshold: usize,
    buffer: Vec<Record>,
    opened: HashSet<String>,
    error: Arc<StickyError>,
    purges: Arc<AtomicU64>,
    seen_purges: u64,
    batches: u64,
    records: u64,
}

impl BatchWorker {
    pub(crate) fn new(
        backend: Arc<dyn Backend>,
        destination_base: String,
        flush_threshold: usize,
        error: Arc<StickyError>,
        purges: Arc<AtomicU64>,
    ) -> Self {
        BatchWorker {
            backend,
            destination_base,
            flush_threshold,
            buffer: Vec::with_capacity(flush_threshold),
            opened: HashSet::new(),
            error,
            purges,
            seen_purges: 0,
            batches: 0,
            records: 0,
        }
    }

    /// Drains `rx` until it is closed or a flush fails.
    pub(crate) async fn run(mut self, mut rx: mpsc::Receiver<Record>) {
        while let Some(record) = rx.recv().await {
            self.buffer.push(record);

            if self.buffer.len() >= self.flush_threshold {
                if let Err(e) = self.flush().await {
                    self.fail(e);
                    return;
                }
            }
        }

        log::info!("Batch sink input closed, flushing remaining records...");
        if let Err(e) = self.flush().await {
            self.fail(e);
            return;
        }
        log::info!(
            "Batch sink shutdown complete: {} records in {} batches",
            self.records,
            self.batches
        );
    }

    fn fail(&self, e: BackendError) {
        log::error!(
            "Batch write failed after {} successful batches, no further batches will be sent: {}",
            self.batches,
            e
        );
        self.error.set_if_empty(SinkError::Backend(e));
    }

    /// Writes all buffered records to the backend as one batch.
    async fn flush(&mut self) -> Result<BulkReport, BackendError> {
        if self.buffer.is_empty() {
            return Ok(BulkReport::default());
        }

        let count = self.buffer.len();
        log::debug!("Flushing batch of {} records", count);

        let records = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.flush_threshold));
        let mut items = Vec::with_capacity(count);
        for record in records {
            let destination = record.destination(&self.destination_base);
            let (key, document) = record.into_keyed_document()?;
            items.push(BulkItem {
                destination,
                key,
                document,
            });
        }

        self.open_destinations(&items).await?;

        let report = self.backend.write_batch(items).await?;
        if report.has_failures() {
            return Err(BackendError::Rejected {
                failed: report.failed,
                succeeded: report.succeeded,
            });
        }

        self.batches += 1;
        self.records += count as u64;
        log::debug!("Successfully flushed {} records", report.succeeded);
        Ok(report)
    }

    /// Opens each destination of the batch that this sink has not opened yet.
    async fn open_destinations(&mut self, items: &[BulkItem]) -> Result<(), BackendError> {
        let purges = self.purges.load(Ordering::SeqCst);
        if purges != self.seen_purges {
            // Destinations were deleted since they were opened.
            self.opened.clear();
            self.seen_purges = purges;
        }

        for item in items {
            if self.opened.contains(&item.destination) {
                continue;
            }
            log::debug!("Opening destination {}", item.destination);
            self.backend.open_or_create(&item.destination).await?;
            self.opened.insert(item.destination.clone());
        }
        Ok(())
    }
}
