//! Access-log records.
//!
//! This module provides:
//! - The [`Record`] data type with its serialized document shape
//! - Deterministic record identity ([`Record::generate_id`])
//! - Day-bucketed destination routing ([`Record::destination`])

mod fingerprint;
mod route;
mod types;

// Re-export public API
pub use fingerprint::{fingerprint, FINGERPRINT_HEX_LEN};
pub use route::{destination_name, destination_pattern};
pub use types::{GeoPoint, Record};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    fn london_record() -> Record {
        let time = DateTime::parse_from_rfc3339("2012-11-01T22:08:41+00:00").expect("valid time");
        Record {
            id: "ABCdefgf".to_string(),
            server_time: time,
            remote: "81.2.69.160".to_string(),
            method: "GET".to_string(),
            uri: "/".to_string(),
            protocol: "HTTP/1.0".to_string(),
            status_code: 0,
            payload: 0,
            remote_ip: "81.2.69.160".to_string(),
            country: "United Kingdom".to_string(),
            city: "London".to_string(),
            timezone: "Europe/London".to_string(),
            location: Some(GeoPoint {
                lat: 51.5142,
                lon: -0.0931,
            }),
            client_time: Some(time),
        }
    }

    #[test]
    fn test_populated_record_document_shape() {
        let value = serde_json::to_value(london_record()).expect("serializable");
        assert_eq!(
            value,
            json!({
                "_id": "ABCdefgf",
                "time": "2012-11-01T22:08:41Z",
                "remote": "81.2.69.160",
                "method": "GET",
                "uri": "/",
                "protocol": "HTTP/1.0",
                "status": 0,
                "payload_size": 0,
                "remote_ip": "81.2.69.160",
                "country": "United Kingdom",
                "city": "London",
                "timezone": "Europe/London",
                "location": {"lat": 51.5142, "lon": -0.0931},
                "client_time": "2012-11-01T22:08:41Z"
            })
        );
    }

    #[test]
    fn test_empty_enrichment_is_omitted() {
        let value = serde_json::to_value(Record::default()).expect("serializable");
        let object = value.as_object().expect("object");
        for omitted in [
            "_id",
            "remote_ip",
            "country",
            "city",
            "timezone",
            "location",
            "client_time",
        ] {
            assert!(!object.contains_key(omitted), "{} should be omitted", omitted);
        }
        assert_eq!(object["time"], "1970-01-01T00:00:00Z");
        assert!(Record::default().is_unenriched());
    }

    #[test]
    fn test_keyed_document_strips_identity() {
        let (key, document) = london_record().into_keyed_document().expect("serializable");
        assert_eq!(key, "ABCdefgf");
        assert!(document.get("_id").is_none());
        assert_eq!(document["city"], "London");
    }

    #[test]
    fn test_record_json_round_trip_keeps_identity() {
        let mut original = london_record();
        original.generate_id().expect("encodable record");
        let text = serde_json::to_string(&original).expect("serializable");
        let mut decoded: Record = serde_json::from_str(&text).expect("deserializable");
        assert_eq!(decoded, original);
        let id = decoded.id.clone();
        assert_eq!(decoded.generate_id().expect("encodable record"), id);
    }
}
