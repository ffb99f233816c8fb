//! Asynchronous batching sink.
//!
//! Records submitted to a [`BatchSink`] go through a bounded queue to one
//! background task that groups them into batches of `flush_threshold` and
//! writes each batch to the [`Backend`] before reading the queue again.
//!
//! - **Backpressure**: `submit` waits while the queue is full; nothing is
//!   dropped because the queue is full.
//! - **Ordering**: batches are contiguous runs of the submission order and
//!   are written one at a time.
//! - **Failure sealing**: the first backend error is latched. The task stops
//!   immediately, and every later `submit` and every `close` return that
//!   same error.
//!
//! Neither `submit` nor `close` has a timeout.

mod sticky;
mod types;
mod worker;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error_handling::{InitializationError, SinkError};
use crate::record::{destination_pattern, Record};
use crate::storage::backend::Backend;

pub use sticky::StickyError;
pub use types::SinkConfig;
use worker::BatchWorker;

/// Bounded, single-consumer batching front end for a [`Backend`].
///
/// The sink can be shared between tasks (`Arc<BatchSink>`); `submit` takes
/// `&self`.
pub struct BatchSink {
    backend: Arc<dyn Backend>,
    destination_base: String,
    sender: Mutex<Option<mpsc::Sender<Record>>>,
    worker: tokio::sync::Mutex<Option<JoinHandle<()>>>,
    error: Arc<StickyError>,
    purges: Arc<AtomicU64>,
}

impl BatchSink {
    /// Starts the background flush task.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::ConfigError` if the configuration is invalid.
    pub fn start(
        backend: Arc<dyn Backend>,
        config: SinkConfig,
    ) -> Result<Self, InitializationError> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let error = Arc::new(StickyError::new());
        let purges = Arc::new(AtomicU64::new(0));

        let worker = BatchWorker::new(
            Arc::clone(&backend),
            config.destination_base.clone(),
            config.flush_threshold,
            Arc::clone(&error),
            Arc::clone(&purges),
        );
        let handle = tokio::spawn(worker.run(rx));

        log::debug!(
            "Batch sink started (destination base: {}, queue: {}, batch: {})",
            config.destination_base,
            config.queue_capacity,
            config.flush_threshold
        );

        Ok(BatchSink {
            backend,
            destination_base: config.destination_base,
            sender: Mutex::new(Some(tx)),
            worker: tokio::sync::Mutex::new(Some(handle)),
            error,
            purges,
        })
    }

    /// Queues a record for storage, waiting while the queue is full.
    ///
    /// Storage is asynchronous: `Ok(())` means the record was queued, not
    /// that it was stored. An error returned here stems from an earlier
    /// batch.
    ///
    /// # Errors
    ///
    /// - the sticky backend error, once one has been recorded
    /// - `SinkError::Closed` if `close` has been called
    pub async fn submit(&self, record: Record) -> Result<(), SinkError> {
        let sender = self.sender()?;
        if sender.send(record).await.is_err() {
            return Err(self.worker_gone());
        }
        Ok(())
    }

    /// Like [`BatchSink::submit`], but blocks the current thread instead of
    /// yielding.
    ///
    /// For producers running on plain threads (e.g. `spawn_blocking`).
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_submit(&self, record: Record) -> Result<(), SinkError> {
        let sender = self.sender()?;
        if sender.blocking_send(record).is_err() {
            return Err(self.worker_gone());
        }
        Ok(())
    }

    /// Deletes all stored content under this sink's destination base.
    ///
    /// Must not run concurrently with `submit`; this is not enforced. A
    /// backend failure is recorded as the sticky error.
    pub async fn remove_all(&self) -> Result<(), SinkError> {
        self.error.check()?;
        let pattern = destination_pattern(&self.destination_base);
        log::info!("Removing all destinations matching {}", pattern);
        if let Err(e) = self.backend.delete_matching(&pattern).await {
            log::error!("Failed to remove destinations matching {}: {}", pattern, e);
            let err = SinkError::Backend(e);
            self.error.set_if_empty(err.clone());
            return Err(err);
        }
        self.purges.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Stops accepting records, writes everything still queued and releases
    /// the backend.
    ///
    /// Returns the sticky error, if any. Calling `close` again returns the
    /// same result without waiting.
    pub async fn close(&self) -> Result<(), SinkError> {
        let mut worker = self.worker.lock().await;
        if let Some(handle) = worker.take() {
            drop(self.take_sender());

            if let Err(e) = handle.await {
                log::error!("Batch sink worker did not shut down cleanly: {}", e);
                self.error
                    .set_if_empty(SinkError::WorkerPanicked(e.to_string()));
            }
            if let Err(e) = self.backend.close().await {
                log::error!("Failed to close backend: {}", e);
                self.error.set_if_empty(SinkError::Backend(e));
            }
        }
        self.error.check()
    }

    /// The sticky error recorded so far, if any.
    pub fn error(&self) -> Option<SinkError> {
        self.error.get()
    }

    /// Prefix shared by all destinations of this sink.
    pub fn destination_base(&self) -> &str {
        &self.destination_base
    }

    fn sender(&self) -> Result<mpsc::Sender<Record>, SinkError> {
        self.error.check()?;
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(SinkError::Closed)
    }

    fn take_sender(&self) -> Option<mpsc::Sender<Record>> {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Error to report when the worker has dropped the queue.
    fn worker_gone(&self) -> SinkError {
        self.error.get().unwrap_or(SinkError::Closed)
    }
}
