//! Conversion of split log fields into [`Record`]s.

use chrono::DateTime;

use crate::error_handling::DecodeError;
use crate::ingest::format::{LineFields, LineFormat};
use crate::record::Record;

/// Builds a record from the fields of line `line`.
///
/// Missing fields are left empty. A present timestamp, status or size that
/// cannot be parsed is an error; a size of `-` means no body.
pub fn decode_fields(
    fields: &LineFields<'_, '_>,
    time_format: &str,
    line: usize,
) -> Result<Record, DecodeError> {
    let text = |name: &str| fields.get(name).map(|v| v.to_string()).unwrap_or_default();
    let mut record = Record {
        remote: text("remote_addr"),
        uri: text("uri"),
        method: text("method"),
        protocol: text("protocol"),
        ..Default::default()
    };

    if let Some(&value) = fields.get("time_local") {
        record.server_time = DateTime::parse_from_str(value, time_format).map_err(|e| {
            DecodeError::InvalidField {
                line,
                field: "time_local",
                value: value.to_string(),
                reason: e.to_string(),
            }
        })?;
    }

    if let Some(&value) = fields.get("status") {
        record.status_code = value.parse().map_err(|e: std::num::ParseIntError| {
            DecodeError::InvalidField {
                line,
                field: "status",
                value: value.to_string(),
                reason: e.to_string(),
            }
        })?;
    }

    if let Some(&value) = fields.get("size") {
        if value != "-" {
            record.payload = value.parse().map_err(|e: std::num::ParseIntError| {
                DecodeError::InvalidField {
                    line,
                    field: "size",
                    value: value.to_string(),
                    reason: e.to_string(),
                }
            })?;
        }
    }

    Ok(record)
}

/// A line format plus the timestamp format of its `$time_local` field.
#[derive(Debug, Clone)]
pub struct LineDecoder {
    format: LineFormat,
    time_format: String,
}

impl LineDecoder {
    pub fn new(format: LineFormat, time_format: impl Into<String>) -> Self {
        LineDecoder {
            format,
            time_format: time_format.into(),
        }
    }

    /// Compiles `format` and pairs it with `time_format`.
    pub fn parse(format: &str, time_format: &str) -> Result<Self, DecodeError> {
        Ok(Self::new(LineFormat::parse(format)?, time_format))
    }

    /// Decodes one line; `line` is its 1-based number, used in errors.
    pub fn decode(&self, text: &str, line: usize) -> Result<Record, DecodeError> {
        let fields = self
            .format
            .split(text)
            .ok_or(DecodeError::LineMismatch { line })?;
        decode_fields(&fields, &self.time_format, line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_LINE_FORMAT, DEFAULT_TIME_FORMAT};
    use std::collections::HashMap;

    fn decoder() -> LineDecoder {
        LineDecoder::parse(DEFAULT_LINE_FORMAT, DEFAULT_TIME_FORMAT).expect("valid format")
    }

    #[test]
    fn test_decode_full_line() {
        let record = decoder()
            .decode(
                r#"199.72.81.55 - - [01/Jul/1995:00:00:01 -0400] "GET /history/apollo/ HTTP/1.0" 200 6245"#,
                1,
            )
            .expect("valid line");

        assert_eq!(record.remote, "199.72.81.55");
        assert_eq!(record.method, "GET");
        assert_eq!(record.uri, "/history/apollo/");
        assert_eq!(record.protocol, "HTTP/1.0");
        assert_eq!(record.status_code, 200);
        assert_eq!(record.payload, 6245);
        assert_eq!(
            record.server_time,
            DateTime::parse_from_rfc3339("1995-07-01T00:00:01-04:00").expect("valid time")
        );
        assert_eq!(record.server_time.offset().local_minus_utc(), -4 * 3600);
        assert!(record.id.is_empty());
        assert!(record.is_unenriched());
    }

    #[test]
    fn test_dash_size_is_zero() {
        let record = decoder()
            .decode(
                r#"burger.letters.com - - [01/Jul/1995:00:00:12 -0400] "GET /images/NASA-logosmall.gif HTTP/1.0" 304 -"#,
                3,
            )
            .expect("valid line");
        assert_eq!(record.remote, "burger.letters.com");
        assert_eq!(record.status_code, 304);
        assert_eq!(record.payload, 0);
    }

    #[test]
    fn test_mismatch_reports_line() {
        assert_eq!(
            decoder().decode("not a log line", 42).map(|_| ()),
            Err(DecodeError::LineMismatch { line: 42 })
        );
    }

    #[test]
    fn test_bad_fields_are_errors() {
        let bad_status = r#"a - - [01/Jul/1995:00:00:01 -0400] "GET / HTTP/1.0" OK 10"#;
        match decoder().decode(bad_status, 5) {
            Err(DecodeError::InvalidField { line, field, value, .. }) => {
                assert_eq!(line, 5);
                assert_eq!(field, "status");
                assert_eq!(value, "OK");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let bad_size = r#"a - - [01/Jul/1995:00:00:01 -0400] "GET / HTTP/1.0" 200 big"#;
        assert!(matches!(
            decoder().decode(bad_size, 6),
            Err(DecodeError::InvalidField { field: "size", .. })
        ));

        let bad_time = r#"a - - [yesterday] "GET / HTTP/1.0" 200 10"#;
        assert!(matches!(
            decoder().decode(bad_time, 7),
            Err(DecodeError::InvalidField {
                field: "time_local",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_fields_are_left_empty() {
        let mut fields: LineFields<'_, '_> = HashMap::new();
        fields.insert("uri", "/only");
        let record = decode_fields(&fields, DEFAULT_TIME_FORMAT, 1).expect("valid");
        assert_eq!(record.uri, "/only");
        assert_eq!(record.remote, "");
        assert_eq!(record.status_code, 0);
        assert_eq!(record.server_time, Record::default().server_time);
    }

    #[test]
    fn test_custom_format() {
        let decoder = LineDecoder::parse("$status|$uri|$time_local", "%Y-%m-%dT%H:%M:%S%z")
            .expect("valid format");
        let record = decoder
            .decode("500|/api|2012-11-01T10:00:00+0100", 1)
            .expect("valid line");
        assert_eq!(record.status_code, 500);
        assert_eq!(record.uri, "/api");
        assert_eq!(
            record.server_time,
            DateTime::parse_from_rfc3339("2012-11-01T09:00:00Z").expect("valid time")
        );
    }
}
