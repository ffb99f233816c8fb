//! Geolocation lookup contract.

use std::net::IpAddr;

/// Location data for one IP address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoLocation {
    pub country: Option<String>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A local (in-process) IP geolocation database.
///
/// `Ok(None)` means the address is not in the database, which is not an
/// error. Implementations must not perform network I/O.
pub trait GeoLookup: Send + Sync {
    fn lookup(&self, ip: IpAddr) -> Result<Option<GeoLocation>, GeoLookupError>;
}

/// A lookup failed for a reason other than "not found".
#[derive(Debug, thiserror::Error)]
#[error("geolocation lookup failed: {0}")]
pub struct GeoLookupError(pub String);
