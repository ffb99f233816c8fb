//! Record data structures.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates of a resolved client address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// A single access-log event plus the fields derived from it.
///
/// Raw fields come from the log decoder; the enrichment fields are empty
/// until [`crate::enrich::Enricher::enrich`] fills them in. `id` is set last,
/// by [`Record::generate_id`], over the final values of every other field.
///
/// Empty enrichment fields are left out of the serialized document rather
/// than written as null or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Content fingerprint (hex SHA-1), used as the storage key.
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Server time of the request, with the offset found in the log.
    #[serde(rename = "time")]
    pub server_time: DateTime<FixedOffset>,

    /// Host name or IP literal of the requester.
    pub remote: String,
    pub method: String,
    pub uri: String,
    pub protocol: String,

    #[serde(rename = "status")]
    pub status_code: u16,

    /// Size of the returned body in bytes.
    #[serde(rename = "payload_size")]
    pub payload: u64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub remote_ip: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,

    /// Server time converted into the client's time zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_time: Option<DateTime<FixedOffset>>,
}

impl Default for Record {
    fn default() -> Self {
        Record {
            id: String::new(),
            server_time: DateTime::<Utc>::default().fixed_offset(),
            remote: String::new(),
            method: String::new(),
            uri: String::new(),
            protocol: String::new(),
            status_code: 0,
            payload: 0,
            remote_ip: String::new(),
            country: String::new(),
            city: String::new(),
            timezone: String::new(),
            location: None,
            client_time: None,
        }
    }
}

impl Record {
    /// Returns true if no enrichment field has been populated.
    pub fn is_unenriched(&self) -> bool {
        self.remote_ip.is_empty()
            && self.country.is_empty()
            && self.city.is_empty()
            && self.timezone.is_empty()
            && self.location.is_none()
            && self.client_time.is_none()
    }

    /// Splits the record into its storage key and the document to persist.
    ///
    /// The key is the identity; it is not embedded in the document.
    pub fn into_keyed_document(mut self) -> Result<(String, serde_json::Value), serde_json::Error> {
        let key = std::mem::take(&mut self.id);
        let document = serde_json::to_value(&self)?;
        Ok((key, document))
    }
}
