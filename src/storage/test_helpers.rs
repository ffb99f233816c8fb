//! Shared test helpers for storage module tests.
//!
//! Provides a recording backend double and record builders used across the
//! sink and backend tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta};
use tokio::sync::Semaphore;

use crate::error_handling::{BackendError, SinkError};
use crate::record::Record;
use crate::storage::backend::{Backend, BulkItem, BulkReport};
use crate::storage::BatchSink;

/// Builds a fingerprinted record `hours` hours after 2012-11-01T00:00:00Z.
pub fn record_at(hours: i64) -> Record {
    let start = DateTime::parse_from_rfc3339("2012-11-01T00:00:00+00:00").expect("valid time");
    let mut record = Record {
        server_time: start + TimeDelta::hours(hours),
        remote: "81.2.69.160".to_string(),
        method: "GET".to_string(),
        uri: format!("/page/{}", hours),
        protocol: "HTTP/1.0".to_string(),
        status_code: 200,
        payload: 1024,
        ..Default::default()
    };
    record.generate_id().expect("encodable record");
    record
}

/// Polls the sink until a sticky error is recorded.
pub async fn wait_for_error(sink: &BatchSink) -> SinkError {
    for _ in 0..1000 {
        if let Some(err) = sink.error() {
            return err;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("sink never recorded an error");
}

/// Backend double that records every call.
///
/// Failures can be injected on the n-th `write_batch` attempt (1-based), and
/// writes can be gated so a test controls when each batch completes.
#[derive(Default)]
pub struct RecordingBackend {
    batches: Mutex<Vec<Vec<BulkItem>>>,
    opened: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    write_attempts: AtomicUsize,
    close_calls: AtomicUsize,
    fail_on_write: Option<usize>,
    reject_on_write: Option<usize>,
    fail_on_close: bool,
    fail_on_delete: bool,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The error returned by injected failures.
    pub fn failure() -> BackendError {
        BackendError::Status {
            status: 503,
            body: "cluster unavailable".to_string(),
        }
    }

    pub fn fail_on_write(mut self, attempt: usize) -> Self {
        self.fail_on_write = Some(attempt);
        self
    }

    /// Reports one rejected item on the given attempt instead of failing it.
    pub fn reject_on_write(mut self, attempt: usize) -> Self {
        self.reject_on_write = Some(attempt);
        self
    }

    pub fn fail_on_close(mut self) -> Self {
        self.fail_on_close = true;
        self
    }

    pub fn fail_on_delete(mut self) -> Self {
        self.fail_on_delete = true;
        self
    }

    /// Every `write_batch` waits for a permit released with [`Self::release`].
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release(&self, writes: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(writes);
        }
    }

    pub async fn wait_for_write_attempts(&self, attempts: usize) {
        for _ in 0..1000 {
            if self.write_attempts() >= attempts {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("backend never saw {} write attempts", attempts);
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().expect("lock").iter().map(Vec::len).collect()
    }

    pub fn items(&self) -> Vec<BulkItem> {
        self.batches.lock().expect("lock").concat()
    }

    pub fn keys(&self) -> Vec<String> {
        self.items().into_iter().map(|item| item.key).collect()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().expect("lock").clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Backend for RecordingBackend {
    async fn open_or_create(&self, destination: &str) -> Result<(), BackendError> {
        self.opened.lock().expect("lock").push(destination.to_string());
        Ok(())
    }

    async fn write_batch(&self, items: Vec<BulkItem>) -> Result<BulkReport, BackendError> {
        let attempt = self.write_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        if self.fail_on_write == Some(attempt) {
            return Err(Self::failure());
        }
        let count = items.len();
        self.batches.lock().expect("lock").push(items);
        if self.reject_on_write == Some(attempt) {
            return Ok(BulkReport {
                succeeded: count - 1,
                failed: 1,
            });
        }
        Ok(BulkReport::success(count))
    }

    async fn delete_matching(&self, pattern: &str) -> Result<(), BackendError> {
        self.deleted.lock().expect("lock").push(pattern.to_string());
        if self.fail_on_delete {
            return Err(Self::failure());
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), BackendError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_close {
            return Err(Self::failure());
        }
        Ok(())
    }
}
