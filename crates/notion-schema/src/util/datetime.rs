//! ISO 8601 date/time parsing for timestamps carried in the wire format.
//!
//! Two shapes occur:
//! - Instants (`created_time`, `expiry_time`): full RFC 3339 date-times
//!   with a UTC offset, e.g. `2020-03-17T19:10:04.968Z`.
//! - Calendar values (date mentions): a bare date (`2021-05-17`), a
//!   date-time with offset, or a date-time without offset when a
//!   separate `time_zone` accompanies it.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Error type for timestamp parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DateTimeParseError {
    pub message: String,
}

/// A calendar value as it may appear in a date mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsedDate {
    /// Date without time of day.
    Date(NaiveDate),
    /// Date-time with an explicit UTC offset.
    DateTime(DateTime<FixedOffset>),
    /// Date-time interpreted in an accompanying IANA time zone.
    Floating(NaiveDateTime),
}

const FLOATING_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parses an RFC 3339 date-time with offset.
pub fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>, DateTimeParseError> {
    DateTime::parse_from_rfc3339(s).map_err(|e| DateTimeParseError {
        message: format!("Invalid date-time {s:?}: {e}"),
    })
}

/// Parses a date, a date-time with offset, or a floating date-time.
pub fn parse_date_or_datetime(s: &str) -> Result<ParsedDate, DateTimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(ParsedDate::DateTime(dt));
    }
    for format in FLOATING_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ParsedDate::Floating(naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(ParsedDate::Date)
        .map_err(|_| DateTimeParseError {
            message: format!("Invalid date or date-time: {s:?}"),
        })
}

/// Formats an instant the way the service does: millisecond precision, `Z` for UTC.
pub fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats a UTC instant the way the service does.
pub fn format_datetime_utc(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
