//! GeoIP database loading from local files.

use maxminddb::Reader;
use std::path::Path;

use crate::error_handling::InitializationError;
use crate::geoip::lookup::MaxMindLookup;
use crate::geoip::types::GeoIpMetadata;

/// Loads a GeoIP City database from a local file path.
///
/// # Errors
///
/// Returns `InitializationError::GeoIpError` if the file cannot be read or is
/// not a valid MaxMind database. This is a startup failure and is not retried.
pub async fn load_from_file(path: &Path) -> Result<MaxMindLookup, InitializationError> {
    log::info!("Loading GeoIP database from: {}", path.display());

    let db_bytes = tokio::fs::read(path).await.map_err(|e| {
        InitializationError::GeoIpError(format!(
            "Failed to read GeoIP database from {}: {}",
            path.display(),
            e
        ))
    })?;

    let reader = Reader::from_source(db_bytes).map_err(|e| {
        InitializationError::GeoIpError(format!(
            "Failed to parse GeoIP database from {}: {}",
            path.display(),
            e
        ))
    })?;

    let metadata = GeoIpMetadata {
        source: path.display().to_string(),
        database_type: reader.metadata.database_type.clone(),
        version: format!("build_{}", reader.metadata.build_epoch),
    };
    log::info!(
        "GeoIP database loaded: {} ({})",
        metadata.database_type,
        metadata.version
    );

    Ok(MaxMindLookup::new(reader, metadata))
}
