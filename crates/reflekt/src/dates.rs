//! Textual date representation used by the converter

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};

use reflekt_types::{names, ConversionError, ReflectResult};

/// Default fallback patterns tried after RFC 3339
pub const DEFAULT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d"];

/// Parses and formats dates
pub trait DateCodec: Send + Sync + fmt::Debug {
    /// Parse text into a UTC date
    fn parse(&self, text: &str) -> ReflectResult<DateTime<Utc>>;

    /// Canonical text of a date
    fn format(&self, date: &DateTime<Utc>) -> String;
}

/// RFC 3339 (UTC, millisecond precision) with configurable fallbacks.
///
/// Fallback patterns are `chrono` format strings, tried in order; patterns
/// without a time component yield midnight UTC.
#[derive(Debug, Clone)]
pub struct CanonicalDates {
    formats: Vec<String>,
}

impl CanonicalDates {
    /// Codec with the given fallback patterns
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    /// Fallback patterns in the order they are tried
    pub fn formats(&self) -> &[String] {
        &self.formats
    }
}

impl Default for CanonicalDates {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS)
    }
}

impl DateCodec for CanonicalDates {
    fn parse(&self, text: &str) -> ReflectResult<DateTime<Utc>> {
        let text = text.trim();

        if let Ok(date) = DateTime::parse_from_rfc3339(text) {
            return Ok(truncate_to_millis(date.with_timezone(&Utc)));
        }

        for format in &self.formats {
            if let Ok(date) = NaiveDateTime::parse_from_str(text, format) {
                return Ok(Utc.from_utc_datetime(&date));
            }
            if let Some(date) = NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
            {
                return Ok(Utc.from_utc_datetime(&date));
            }
        }

        Err(ConversionError::MalformedLiteral {
            value: text.to_string(),
            target: names::DATE.to_string(),
            reason: "unrecognized date format".to_string(),
        }
        .into())
    }

    fn format(&self, date: &DateTime<Utc>) -> String {
        date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Date at the given epoch milliseconds, if representable
pub fn date_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single().map(truncate_to_millis)
}

/// Drop everything below the millisecond
pub fn truncate_to_millis(date: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = date.nanosecond() / 1_000_000 * 1_000_000;
    date.with_nanosecond(nanos).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_round_trip() {
        let codec = CanonicalDates::default();
        let date = date_from_millis(1_700_000_000_123).unwrap();

        let text = codec.format(&date);
        assert_eq!(text, "2023-11-14T22:13:20.123Z");
        assert_eq!(codec.parse(&text).unwrap(), date);
    }

    #[test]
    fn test_sub_millisecond_digits_are_dropped() {
        let codec = CanonicalDates::default();
        let date = codec.parse("2023-11-14T22:13:20.123456789Z").unwrap();
        assert_eq!(date, date_from_millis(1_700_000_000_123).unwrap());

        let precise = Utc.timestamp_opt(1_700_000_000, 123_999_999).unwrap();
        assert_eq!(truncate_to_millis(precise).nanosecond(), 123_000_000);
    }

    #[test]
    fn test_offsets_normalize_to_utc() {
        let codec = CanonicalDates::default();
        let date = codec.parse("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(codec.format(&date), "2024-03-01T10:00:00.000Z");
    }

    #[test]
    fn test_fallback_patterns() {
        let codec = CanonicalDates::default();
        assert_eq!(
            codec.format(&codec.parse("2024-03-01 08:30:15").unwrap()),
            "2024-03-01T08:30:15.000Z"
        );
        assert_eq!(
            codec.format(&codec.parse("2024-03-01 08:30").unwrap()),
            "2024-03-01T08:30:00.000Z"
        );
        assert_eq!(
            codec.format(&codec.parse("2024-03-01").unwrap()),
            "2024-03-01T00:00:00.000Z"
        );
    }

    #[test]
    fn test_custom_patterns_only() {
        let codec = CanonicalDates::new(["%d/%m/%Y"]);
        assert!(codec.parse("01/03/2024").is_ok());
        assert!(codec.parse("2024-03-01").is_err());
    }

    #[test]
    fn test_malformed() {
        let err = CanonicalDates::default().parse("yesterday").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }
}
