//! IP address lookup against a loaded MaxMind City database.

use maxminddb::Reader;
use std::net::IpAddr;

use super::types::GeoIpMetadata;
use crate::enrich::{GeoLocation, GeoLookup, GeoLookupError};

/// A MaxMind City database held in memory.
pub struct MaxMindLookup {
    reader: Reader<Vec<u8>>,
    metadata: GeoIpMetadata,
}

impl MaxMindLookup {
    pub(crate) fn new(reader: Reader<Vec<u8>>, metadata: GeoIpMetadata) -> Self {
        Self { reader, metadata }
    }

    /// Metadata of the loaded database.
    pub fn metadata(&self) -> &GeoIpMetadata {
        &self.metadata
    }
}

impl GeoLookup for MaxMindLookup {
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoLocation>, GeoLookupError> {
        // A miss is an empty result, not an error.
        let city_lookup = self
            .reader
            .lookup(ip)
            .map_err(|e| GeoLookupError(e.to_string()))?;

        if !city_lookup.has_data() {
            return Ok(None);
        }

        let city: maxminddb::geoip2::City = match city_lookup.decode() {
            Ok(Some(city)) => city,
            Ok(None) => return Ok(None),
            Err(e) => return Err(GeoLookupError(e.to_string())),
        };

        Ok(Some(GeoLocation {
            country: city.country.names.english.map(|s| s.to_string()),
            city: city.city.names.english.map(|s| s.to_string()),
            timezone: city.location.time_zone.map(|s| s.to_string()),
            latitude: city.location.latitude,
            longitude: city.location.longitude,
        }))
    }
}
