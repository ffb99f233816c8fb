//! Time-bucketed destination names.

use chrono::{DateTime, FixedOffset, Utc};

use super::types::Record;

/// Returns `base-YYYY-MM-DD` for the UTC calendar day of `time`.
pub fn destination_name(base: &str, time: &DateTime<FixedOffset>) -> String {
    format!("{}-{}", base, time.with_timezone(&Utc).format("%Y-%m-%d"))
}

/// Returns the name pattern matching every destination under `base`.
pub fn destination_pattern(base: &str) -> String {
    format!("{}-*", base)
}

impl Record {
    /// Destination this record is stored in, one per UTC day.
    pub fn destination(&self, base: &str) -> String {
        destination_name(base, &self.server_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: &str) -> Record {
        Record {
            server_time: DateTime::parse_from_rfc3339(ts).expect("valid timestamp"),
            ..Default::default()
        }
    }

    #[test]
    fn test_records_across_midnight_use_different_destinations() {
        let before = at("2012-11-01T23:59:59Z").destination("requests");
        let after = at("2012-11-02T00:00:01Z").destination("requests");
        assert_eq!(before, "requests-2012-11-01");
        assert_eq!(after, "requests-2012-11-02");
        assert_ne!(before, after);
        assert!(before.starts_with("requests-") && after.starts_with("requests-"));
    }

    #[test]
    fn test_destination_uses_utc_day_not_local_day() {
        // 23:30 at -07:00 is already the next day in UTC.
        let record = at("1995-07-01T23:30:00-07:00");
        assert_eq!(record.destination("logs"), "logs-1995-07-02");
    }

    #[test]
    fn test_default_record_routes_to_epoch() {
        assert_eq!(Record::default().destination("requests"), "requests-1970-01-01");
    }

    #[test]
    fn test_destination_pattern_matches_prefix() {
        assert_eq!(destination_pattern("requests"), "requests-*");
    }
}
