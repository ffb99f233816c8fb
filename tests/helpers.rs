// Shared test helpers for log files and backend doubles.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Each test file uses a subset

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;

use traffic_import::error_handling::BackendError;
use traffic_import::storage::{Backend, BulkItem, BulkReport};

/// Lines from the NASA-HTTP July 1995 log, all on 1995-07-01 UTC.
pub const NASA_LINES: [&str; 4] = [
    r#"199.72.81.55 - - [01/Jul/1995:00:00:01 -0400] "GET /history/apollo/ HTTP/1.0" 200 6245"#,
    r#"unicomp6.unicomp.net - - [01/Jul/1995:00:00:06 -0400] "GET /shuttle/countdown/ HTTP/1.0" 200 3985"#,
    r#"199.120.110.21 - - [01/Jul/1995:00:00:09 -0400] "GET /shuttle/missions/sts-73/mission-sts-73.html HTTP/1.0" 200 4085"#,
    r#"burger.letters.com - - [01/Jul/1995:00:00:11 -0400] "GET /shuttle/countdown/liftoff.html HTTP/1.0" 304 -"#,
];

/// Writes `lines` to `dir/name`, gzip-compressed if `gzip` is set.
pub fn write_log(dir: &Path, name: &str, lines: &[&str], gzip: bool) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');

    let bytes = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(content.as_bytes())
            .expect("Failed to compress log");
        encoder.finish().expect("Failed to finish gzip stream")
    } else {
        content.into_bytes()
    };
    std::fs::write(&path, bytes).expect("Failed to write log file");
    path
}

/// In-memory backend that keeps every item, optionally failing one write.
#[derive(Default)]
pub struct MemoryBackend {
    items: Mutex<Vec<BulkItem>>,
    batches: Mutex<Vec<usize>>,
    writes: AtomicUsize,
    fail_on_write: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `attempt`-th write (1-based) fails with a 500 status.
    pub fn failing_on(attempt: usize) -> Self {
        Self {
            fail_on_write: Some(attempt),
            ..Self::default()
        }
    }

    pub fn items(&self) -> Vec<BulkItem> {
        self.items.lock().expect("lock").clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().expect("lock").clone()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn open_or_create(&self, _destination: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn write_batch(&self, items: Vec<BulkItem>) -> Result<BulkReport, BackendError> {
        let attempt = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_write == Some(attempt) {
            return Err(BackendError::Status {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        let count = items.len();
        self.batches.lock().expect("lock").push(count);
        self.items.lock().expect("lock").extend(items);
        Ok(BulkReport::success(count))
    }

    async fn delete_matching(&self, _pattern: &str) -> Result<(), BackendError> {
        self.items.lock().expect("lock").clear();
        Ok(())
    }

    async fn close(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
