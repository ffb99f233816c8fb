//! JSON array backend.
//!
//! Writes every document as one element of a pretty-printed JSON array, with
//! the storage key embedded as `_id`. Used for dry runs (`--test`) and for
//! exporting to a file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::error_handling::BackendError;
use crate::storage::backend::{Backend, BulkItem, BulkReport};

struct JsonWriter {
    out: Box<dyn Write + Send>,
    written: usize,
    closed: bool,
}

impl JsonWriter {
    fn append(&mut self, documents: Vec<String>) -> Result<(), BackendError> {
        if self.closed {
            return Err(BackendError::Io("JSON writer is closed".to_string()));
        }
        for document in documents {
            if self.written > 0 {
                writeln!(self.out, ",")?;
            }
            write!(self.out, "{}", document)?;
            self.written += 1;
        }
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), BackendError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.written > 0 {
            writeln!(self.out)?;
        }
        writeln!(self.out, "]")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Backend writing a JSON array of documents to any writer.
///
/// The opening `[` is written on construction and the closing `]` on the
/// first `close`. Destinations are ignored.
pub struct JsonBackend {
    writer: Arc<Mutex<JsonWriter>>,
}

impl JsonBackend {
    pub fn new<W: Write + Send + 'static>(out: W) -> Result<Self, BackendError> {
        let mut out: Box<dyn Write + Send> = Box::new(out);
        writeln!(out, "[")?;
        Ok(JsonBackend {
            writer: Arc::new(Mutex::new(JsonWriter {
                out,
                written: 0,
                closed: false,
            })),
        })
    }

    pub fn stdout() -> Result<Self, BackendError> {
        Self::new(std::io::stdout())
    }

    /// Creates (or truncates) `path` and writes the array to it.
    pub fn create(path: &Path) -> Result<Self, BackendError> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }

    /// Runs `f` on the writer from the blocking pool; stdout and files are
    /// written with blocking I/O.
    async fn with_writer<F>(&self, f: F) -> Result<(), BackendError>
    where
        F: FnOnce(&mut JsonWriter) -> Result<(), BackendError> + Send + 'static,
    {
        let writer = Arc::clone(&self.writer);
        tokio::task::spawn_blocking(move || {
            let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut writer)
        })
        .await
        .map_err(|e| BackendError::Io(format!("JSON writer task failed: {}", e)))?
    }
}

/// Pretty-prints `document` with `_id` set, indented one level.
fn render(item: BulkItem) -> Result<String, BackendError> {
    let mut document = match item.document {
        Value::Object(map) => map,
        other => {
            return Err(BackendError::Serialization(format!(
                "document is not an object: {}",
                other
            )))
        }
    };
    document.insert("_id".to_string(), Value::String(item.key));

    let pretty = serde_json::to_string_pretty(&Value::Object(document))?;
    let indented: Vec<String> = pretty.lines().map(|line| format!("  {}", line)).collect();
    Ok(indented.join("\n"))
}

#[async_trait]
impl Backend for JsonBackend {
    async fn open_or_create(&self, _destination: &str) -> Result<(), BackendError> {
        Ok(())
    }

    async fn write_batch(&self, items: Vec<BulkItem>) -> Result<BulkReport, BackendError> {
        let count = items.len();
        let rendered = items
            .into_iter()
            .map(render)
            .collect::<Result<Vec<_>, _>>()?;

        self.with_writer(move |writer| writer.append(rendered)).await?;
        Ok(BulkReport::success(count))
    }

    async fn delete_matching(&self, pattern: &str) -> Result<(), BackendError> {
        log::debug!("JSON output cannot remove {}, nothing to do", pattern);
        Ok(())
    }

    async fn close(&self) -> Result<(), BackendError> {
        self.with_writer(JsonWriter::finish).await
    }
}
