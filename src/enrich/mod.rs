//! Record enrichment.
//!
//! Derives the resolved IP, geolocation, time zone and client-local time of
//! a [`Record`] from its remote address. Enrichment never fails: every
//! problem degrades to a field left empty.
//!
//! Host names are not resolved; only remote addresses that are already IP
//! literals are enriched.

mod types;

use std::net::IpAddr;
use std::sync::Arc;

use chrono_tz::Tz;

use crate::record::{GeoPoint, Record};

pub use types::{GeoLocation, GeoLookup, GeoLookupError};

/// Fills in the derived fields of records.
///
/// The geolocation database is injected at construction and shared between
/// clones, so one `Enricher` can be used from many tasks.
#[derive(Clone, Default)]
pub struct Enricher {
    lookup: Option<Arc<dyn GeoLookup>>,
}

impl Enricher {
    /// An enricher that only copies IP literals into `remote_ip`.
    pub fn new() -> Self {
        Self { lookup: None }
    }

    /// An enricher backed by a geolocation database.
    pub fn with_lookup(lookup: Arc<dyn GeoLookup>) -> Self {
        Self {
            lookup: Some(lookup),
        }
    }

    /// Whether a geolocation database is configured.
    pub fn has_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    /// Enriches `record` in place.
    pub fn enrich(&self, record: &mut Record) {
        let Ok(ip) = record.remote.parse::<IpAddr>() else {
            return;
        };
        record.remote_ip = record.remote.clone();

        let Some(lookup) = self.lookup.as_ref() else {
            return;
        };
        let location = match lookup.lookup(ip) {
            Ok(Some(location)) => location,
            Ok(None) => return,
            Err(e) => {
                log::debug!("GeoIP lookup for {} failed: {}", ip, e);
                return;
            }
        };
        apply_location(record, location);
    }
}

fn apply_location(record: &mut Record, location: GeoLocation) {
    record.country = location.country.unwrap_or_default();
    record.city = location.city.unwrap_or_default();
    record.location = match (location.latitude, location.longitude) {
        (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
        _ => None,
    };
    record.timezone = location.timezone.unwrap_or_default();
    if record.timezone.is_empty() {
        return;
    }

    match record.timezone.parse::<Tz>() {
        Ok(tz) => {
            record.client_time = Some(record.server_time.with_timezone(&tz).fixed_offset());
        }
        Err(e) => {
            log::debug!("Unable to load time zone {:?}: {}", record.timezone, e);
        }
    }
}
