//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a run:
//! - Logger
//! - Storage backend (Elasticsearch, or JSON on stdout in test mode)
//! - Record enricher with the optional GeoIP database
//!
//! All initialization functions return proper error types for error handling.

mod logger;

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::enrich::Enricher;
use crate::error_handling::InitializationError;
use crate::storage::{Backend, ElasticBackend, JsonBackend};

// Re-export public API
pub use logger::init_logger_with;

/// Creates the storage backend selected by `config`.
///
/// # Errors
///
/// Returns `InitializationError::BackendError` if Elasticsearch cannot be
/// reached or refuses the index template.
pub async fn init_backend(config: &Config) -> Result<Arc<dyn Backend>, InitializationError> {
    if config.test_mode {
        log::info!("Test mode: writing documents to stdout");
        return Ok(Arc::new(JsonBackend::stdout()?));
    }

    log::info!("Connecting to host: {}", config.elastic_host);
    let backend = ElasticBackend::connect(&config.elastic_host, &config.index_base).await?;
    Ok(Arc::new(backend))
}

/// Creates the enricher, loading the GeoIP database if a path is given.
///
/// # Errors
///
/// Returns `InitializationError::GeoIpError` if the database cannot be loaded.
pub async fn init_enricher(geodb: Option<&Path>) -> Result<Enricher, InitializationError> {
    match geodb {
        Some(path) => {
            let lookup = crate::geoip::load_from_file(path).await?;
            Ok(Enricher::with_lookup(Arc::new(lookup)))
        }
        None => {
            log::debug!("No GeoIP database configured, only IP literals are recorded");
            Ok(Enricher::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_enricher_without_database() {
        let enricher = init_enricher(None).await.expect("no database is fine");
        assert!(!enricher.has_lookup());
    }

    #[tokio::test]
    async fn test_init_enricher_with_missing_database() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let result = init_enricher(Some(&dir.path().join("missing.mmdb"))).await;
        assert!(matches!(result, Err(InitializationError::GeoIpError(_))));
    }

    #[tokio::test]
    async fn test_init_backend_rejects_bad_endpoint() {
        let config = Config {
            elastic_host: "not a url".to_string(),
            ..Default::default()
        };
        let result = init_backend(&config).await;
        assert!(matches!(result, Err(InitializationError::BackendError(_))));
    }

    #[tokio::test]
    async fn test_init_backend_test_mode() {
        let config = Config {
            test_mode: true,
            ..Default::default()
        };
        let backend = init_backend(&config).await.expect("stdout backend");
        backend.close().await.expect("close");
    }
}
