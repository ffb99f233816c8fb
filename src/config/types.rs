//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_ELASTIC_HOST, DEFAULT_FLUSH_THRESHOLD, DEFAULT_INDEX_BASE, DEFAULT_LINE_FORMAT,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_TIME_FORMAT, ELASTIC_LINK_ENV,
};
use crate::storage::SinkConfig;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Import two days of logs into a local cluster
/// traffic_import access.log.1 access.log.2.gz
///
/// # Start from empty indexes and keep going past broken files
/// traffic_import --clean -e --geodb GeoLite2-City.mmdb /var/log/nginx/access.log*
///
/// # Print the documents instead of indexing them
/// traffic_import --test access.log
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "traffic_import",
    about = "Imports web server access logs into Elasticsearch."
)]
pub struct Opt {
    /// Log files to import (plain or gzip)
    #[arg(value_parser, required = true)]
    pub files: Vec<PathBuf>,

    /// Line format using nginx `$variable` syntax
    #[arg(long, default_value = DEFAULT_LINE_FORMAT)]
    pub format: String,

    /// strftime format of `$time_local`
    #[arg(long, default_value = DEFAULT_TIME_FORMAT)]
    pub time_format: String,

    /// Continue with the next file when a file fails
    #[arg(short = 'e', long)]
    pub continue_on_error: bool,

    /// Elasticsearch endpoint (overridden by ELASTICSEARCH_PORT_9200_TCP)
    #[arg(long, default_value = DEFAULT_ELASTIC_HOST)]
    pub elastic: String,

    /// Base name of the daily indexes
    #[arg(long, default_value = DEFAULT_INDEX_BASE)]
    pub index: String,

    /// Delete all existing indexes of the base name before importing
    #[arg(long)]
    pub clean: bool,

    /// MaxMind GeoLite2/GeoIP2 City database for client geolocation
    #[arg(long)]
    pub geodb: Option<PathBuf>,

    /// Write the documents to stdout as a JSON array instead of indexing them
    #[arg(long)]
    pub test: bool,

    /// Records queued before readers wait for the writer
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Records per bulk request
    #[arg(long, default_value_t = DEFAULT_FLUSH_THRESHOLD)]
    pub flush_threshold: usize,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use traffic_import::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     files: vec![PathBuf::from("access.log")],
///     test_mode: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Files to import, in order
    pub files: Vec<PathBuf>,

    /// Line format using nginx `$variable` syntax
    pub line_format: String,

    /// strftime format of `$time_local`
    pub time_format: String,

    /// Skip to the next file when a file fails
    pub continue_on_error: bool,

    /// Elasticsearch endpoint
    pub elastic_host: String,

    /// Base name of the daily indexes
    pub index_base: String,

    /// Remove all indexes of `index_base` before importing
    pub clean: bool,

    /// Optional MaxMind City database
    pub geodb: Option<PathBuf>,

    /// Write JSON to stdout instead of Elasticsearch
    pub test_mode: bool,

    pub queue_capacity: usize,
    pub flush_threshold: usize,

    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            line_format: DEFAULT_LINE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            continue_on_error: false,
            elastic_host: DEFAULT_ELASTIC_HOST.to_string(),
            index_base: DEFAULT_INDEX_BASE.to_string(),
            clean: false,
            geodb: None,
            test_mode: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            files: opt.files,
            line_format: opt.format,
            time_format: opt.time_format,
            continue_on_error: opt.continue_on_error,
            elastic_host: opt.elastic,
            index_base: opt.index,
            clean: opt.clean,
            geodb: opt.geodb,
            test_mode: opt.test,
            queue_capacity: opt.queue_capacity,
            flush_threshold: opt.flush_threshold,
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}

impl Config {
    /// Applies `ELASTICSEARCH_PORT_9200_TCP` if it is set and not empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(link) = std::env::var(ELASTIC_LINK_ENV) {
            if !link.trim().is_empty() {
                self.elastic_host = docker_link_host(&link);
                log::debug!("Using Elasticsearch endpoint from {}", ELASTIC_LINK_ENV);
            }
        }
        self
    }

    /// Batch sink settings derived from this configuration.
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            destination_base: self.index_base.clone(),
            queue_capacity: self.queue_capacity,
            flush_threshold: self.flush_threshold,
        }
    }
}

/// Turns a docker link address (`tcp://host:port`) into an HTTP endpoint.
pub fn docker_link_host(link: &str) -> String {
    let link = link.trim();
    match link.strip_prefix("tcp://") {
        Some(rest) => format!("http://{}", rest),
        None => link.to_string(),
    }
}
