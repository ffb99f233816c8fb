//! traffic_import library: web server access logs into Elasticsearch
//!
//! This library decodes access log lines, enriches them with the client's
//! location and time zone, gives every record a content-derived identity and
//! stores the records in daily indexes through an asynchronous batching sink.
//!
//! # Example
//!
//! ```no_run
//! use traffic_import::{run_import, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     files: vec![PathBuf::from("access.log.gz")],
//!     geodb: Some(PathBuf::from("GeoLite2-City.mmdb")),
//!     ..Default::default()
//! };
//!
//! let report = run_import(config).await?;
//! println!("Imported {} records from {} files", report.records, report.files);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod enrich;
pub mod error_handling;
pub mod geoip;
pub mod ingest;
pub mod initialization;
pub mod record;
pub mod storage;

mod app;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use enrich::Enricher;
pub use record::Record;
pub use run::{run_import, RunReport};
pub use storage::{BatchSink, SinkConfig};

// Internal run module (contains the import driver)
mod run {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{anyhow, Context, Result};
    use log::error;

    use crate::app::{print_error_statistics, print_run_summary};
    use crate::config::Config;
    use crate::error_handling::{ImportError, ImportStats};
    use crate::ingest::{import_file, LineDecoder};
    use crate::initialization::{init_backend, init_enricher};
    use crate::storage::BatchSink;

    /// Results of an import run.
    #[derive(Debug, Clone)]
    pub struct RunReport {
        /// Number of files imported completely
        pub files: usize,
        /// Files that failed (only non-empty with `continue_on_error`)
        pub failed_files: Vec<PathBuf>,
        /// Records handed to the sink from completely imported files
        pub records: u64,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    impl RunReport {
        pub fn is_success(&self) -> bool {
            self.failed_files.is_empty()
        }
    }

    /// Imports every file of `config` into the configured backend.
    ///
    /// Files are imported one after another through a single batch sink.
    /// With `clean` set, all existing indexes of the base name are deleted
    /// before the first file.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The log format is invalid
    /// - The backend or the GeoIP database cannot be initialized
    /// - A file fails and `continue_on_error` is not set
    /// - The sink reports a storage error, which always ends the run
    pub async fn run_import(config: Config) -> Result<RunReport> {
        let start = Instant::now();

        let decoder = LineDecoder::parse(&config.line_format, &config.time_format)
            .context("Invalid log format")?;
        let backend = init_backend(&config)
            .await
            .context("Failed to initialize storage backend")?;
        let enricher = init_enricher(config.geodb.as_deref())
            .await
            .context("Failed to load GeoIP database")?;
        let sink = Arc::new(
            BatchSink::start(backend, config.sink_config())
                .context("Failed to start batch sink")?,
        );

        if config.clean {
            if let Err(e) = sink.remove_all().await {
                let _ = sink.close().await;
                return Err(anyhow!(e).context("Failed to remove existing indexes"));
            }
        }

        let stats = ImportStats::new();
        let mut report = RunReport {
            files: 0,
            failed_files: Vec::new(),
            records: 0,
            elapsed_seconds: 0.0,
        };
        let mut fatal = None;

        for path in &config.files {
            match import_file(path, &decoder, &enricher, &sink).await {
                Ok(file_report) => {
                    report.files += 1;
                    report.records += file_report.records;
                }
                Err(e) => {
                    error!("{}: {}", path.display(), e);
                    stats.increment_error(e.error_type());
                    report.failed_files.push(path.clone());

                    // The sink is sealed; later files would fail the same way.
                    let sealed = matches!(e, ImportError::Sink(_));
                    if sealed || !config.continue_on_error {
                        fatal = Some(anyhow!(e).context(format!("{}", path.display())));
                        break;
                    }
                }
            }
        }

        let closed = sink.close().await;
        report.elapsed_seconds = start.elapsed().as_secs_f64();
        print_error_statistics(&stats);

        if let Err(e) = closed {
            return Err(anyhow!(e).context("Failed to store records"));
        }
        if let Some(e) = fatal {
            return Err(e);
        }

        print_run_summary(&report);
        Ok(report)
    }
}
