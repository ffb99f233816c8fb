//! Error type definitions.
//!
//! This module defines all error types used throughout the application, plus
//! the categories tracked by [`super::ImportStats`].

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
///
/// All of these are fatal: they happen before any record is processed and
/// are never retried.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// The storage backend could not be reached or configured.
    #[error("Backend initialization error: {0}")]
    BackendError(#[from] BackendError),

    /// The GeoIP database could not be read or parsed.
    #[error("GeoIP database error: {0}")]
    GeoIpError(String),

    /// A configuration value is out of range (e.g. a zero queue capacity).
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

/// A present log field that could not be parsed.
///
/// Scoped to one line. The importer propagates it to the caller, who decides
/// whether to abort or skip the file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The line did not match the configured log format at all.
    #[error("line {line}: does not match log format")]
    LineMismatch { line: usize },

    /// A recognised field was present but could not be parsed.
    #[error("line {line}: invalid {field} value {value:?}: {reason}")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The log format itself could not be compiled.
    #[error("invalid log format: {0}")]
    InvalidFormat(String),
}

/// Failures reported by a storage backend.
///
/// Backend errors are kept as plain messages so that one value can be
/// latched by the sink and handed out to every caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Transport level failure (connection refused, timeout, ...).
    #[error("backend request failed: {0}")]
    Http(String),

    /// The backend answered with an unexpected HTTP status.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// A bulk write was accepted but some documents were rejected.
    #[error("bulk index returned error(s). {failed} failed, {succeeded} succeeded")]
    Rejected { failed: usize, succeeded: usize },

    /// The backend did not acknowledge an administrative operation.
    #[error("backend did not acknowledge {0}")]
    NotAcknowledged(String),

    /// Local I/O failure (file backends).
    #[error("backend I/O error: {0}")]
    Io(String),

    /// A document could not be encoded or a response could not be decoded.
    #[error("backend serialization error: {0}")]
    Serialization(String),

    /// Invalid endpoint or backend settings.
    #[error("backend configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Http(e.to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(e: std::io::Error) -> Self {
        BackendError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Serialization(e.to_string())
    }
}

/// Errors returned by [`crate::storage::BatchSink`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// `submit` was called after `close`.
    #[error("sink is closed")]
    Closed,

    /// The backend failed; once recorded this error is returned forever.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The background flush task panicked.
    #[error("batch worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Failure importing one log file.
///
/// Any of these ends the import of the file it occurred in.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file could not be opened or is not a readable gzip stream.
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading failed part way through the file.
    #[error("read error after line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A decoded record could not be encoded for its identity.
    #[error("cannot encode record from line {line}: {source}")]
    Identity {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The batch sink refused the record (sticky backend error or closed).
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The reader task panicked.
    #[error("import task failed: {0}")]
    Panicked(String),
}

impl ImportError {
    /// Statistics category of this failure.
    pub fn error_type(&self) -> ImportErrorType {
        match self {
            ImportError::Open { .. } => ImportErrorType::FileOpenError,
            ImportError::Read { .. } | ImportError::Panicked(_) => ImportErrorType::FileReadError,
            ImportError::Decode(_) | ImportError::Identity { .. } => ImportErrorType::DecodeError,
            ImportError::Sink(_) => ImportErrorType::SinkError,
        }
    }
}

/// Categories of failures counted during an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ImportErrorType {
    /// The input file could not be opened or decompressed.
    FileOpenError,
    /// Reading from the input stream failed mid-file.
    FileReadError,
    /// A log line could not be decoded.
    DecodeError,
    /// The sink rejected a record (sticky backend error).
    SinkError,
}

impl std::fmt::Display for ImportErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ImportErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportErrorType::FileOpenError => "File open error",
            ImportErrorType::FileReadError => "File read error",
            ImportErrorType::DecodeError => "Log line decode error",
            ImportErrorType::SinkError => "Storage error",
        }
    }
}
