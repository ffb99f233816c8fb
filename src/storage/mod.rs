//! Storage: the batching sink and the backends it writes to.

pub mod backend;
pub mod elastic;
pub mod json;
pub mod null;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used items
pub use backend::{Backend, BulkItem, BulkReport};
pub use elastic::ElasticBackend;
pub use json::JsonBackend;
pub use null::NullBackend;
pub use sink::{BatchSink, SinkConfig, StickyError};
