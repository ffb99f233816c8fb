//! GeoIP lookup using a MaxMind GeoLite2/GeoIP2 City database.
//!
//! The database is loaded once from a local `.mmdb` file and injected into
//! the [`crate::enrich::Enricher`]; there is no process-wide reader.

mod loader;
mod lookup;
mod types;

// Re-export public API
pub use loader::load_from_file;
pub use lookup::MaxMindLookup;
pub use types::GeoIpMetadata;
