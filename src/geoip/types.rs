//! GeoIP data structures.

use serde::{Deserialize, Serialize};

/// Metadata about a loaded GeoIP database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpMetadata {
    /// Source path
    pub source: String,
    /// Database type, e.g. `GeoLite2-City`
    pub database_type: String,
    /// Database build version (`build_<epoch>`)
    pub version: String,
}
