//! Access log ingestion.
//!
//! This module provides:
//! - Log line formats in nginx `$variable` syntax ([`LineFormat`])
//! - Conversion of line fields into records ([`LineDecoder`], [`decode_fields`])
//! - Plain and gzip file reading ([`open_log`])
//! - The per-file import loop ([`import_file`])

mod decode;
mod format;
mod import;
mod reader;

// Re-export public API
pub use decode::{decode_fields, LineDecoder};
pub use format::{LineFields, LineFormat};
pub use import::{import_file, ImportReport};
pub use reader::{open_log, read_line};
