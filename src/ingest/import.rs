//! Importing one log file into a batch sink.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::PROGRESS_INTERVAL;
use crate::enrich::Enricher;
use crate::error_handling::ImportError;
use crate::ingest::decode::LineDecoder;
use crate::ingest::reader::{open_log, read_line};
use crate::storage::BatchSink;

/// Outcome of a successfully imported file.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub path: PathBuf,
    /// Records handed to the sink
    pub records: u64,
    pub elapsed: Duration,
}

impl ImportReport {
    /// Records per second.
    pub fn rate(&self) -> f64 {
        records_per_second(self.records, self.elapsed)
    }
}

fn records_per_second(records: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        records as f64 / secs
    } else {
        0.0
    }
}

/// Decodes, enriches, fingerprints and submits every line of `path`.
///
/// The file is read on a blocking thread; records are handed to the sink
/// with [`BatchSink::blocking_submit`]. Blank lines are skipped. The first
/// failure ends the import of this file.
///
/// Records already submitted when a failure occurs stay in the sink.
pub async fn import_file(
    path: &Path,
    decoder: &LineDecoder,
    enricher: &Enricher,
    sink: &Arc<BatchSink>,
) -> Result<ImportReport, ImportError> {
    let path = path.to_path_buf();
    let decoder = decoder.clone();
    let enricher = enricher.clone();
    let sink = Arc::clone(sink);

    tokio::task::spawn_blocking(move || read_file(path, &decoder, &enricher, &sink))
        .await
        .map_err(|e| ImportError::Panicked(e.to_string()))?
}

fn read_file(
    path: PathBuf,
    decoder: &LineDecoder,
    enricher: &Enricher,
    sink: &BatchSink,
) -> Result<ImportReport, ImportError> {
    let start = Instant::now();
    let mut reader = open_log(&path).map_err(|source| ImportError::Open {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Importing {}", path.display());

    let mut records = 0u64;
    let mut line_no = 0usize;
    let mut line = String::new();
    loop {
        let more = read_line(&mut reader, &mut line).map_err(|source| ImportError::Read {
            line: line_no,
            source,
        })?;
        if !more {
            break;
        }
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut record = decoder.decode(&line, line_no)?;
        enricher.enrich(&mut record);
        record
            .generate_id()
            .map_err(|source| ImportError::Identity {
                line: line_no,
                source,
            })?;
        sink.blocking_submit(record)?;

        records += 1;
        if records % PROGRESS_INTERVAL == 0 {
            log::info!(
                "{}: processed {} records, {:.2} records/sec",
                path.display(),
                records,
                records_per_second(records, start.elapsed())
            );
        }
    }

    let report = ImportReport {
        path,
        records,
        elapsed: start.elapsed(),
    };
    log::info!(
        "Processing {} took {:.2?}, {} records ({:.2} records/sec)",
        report.path.display(),
        report.elapsed,
        report.records,
        report.rate()
    );
    Ok(report)
}
