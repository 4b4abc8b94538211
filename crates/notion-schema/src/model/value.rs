//! Small value objects shared by several resources.
//!
//! Timestamps keep the exact wire string next to the parsed value so that
//! serialization reproduces the input byte for byte.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::util::datetime::{
    format_datetime, parse_date_or_datetime, parse_datetime, DateTimeParseError, ParsedDate,
};

/// An instant carried as an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp {
    raw: String,
    value: DateTime<FixedOffset>,
}

impl Timestamp {
    pub fn parse(s: &str) -> Result<Timestamp, DateTimeParseError> {
        let value = parse_datetime(s)?;
        Ok(Timestamp {
            raw: s.to_string(),
            value,
        })
    }

    pub fn from_datetime(value: DateTime<FixedOffset>) -> Timestamp {
        Timestamp {
            raw: format_datetime(&value),
            value,
        }
    }

    /// The wire string, exactly as parsed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.value
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.value.with_timezone(&Utc)
    }

    /// Time left until this instant; negative once it has passed.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> TimeDelta {
        self.to_utc() - now
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp::from_datetime(value.fixed_offset())
    }
}

/// A calendar value carried as an ISO 8601 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateValue {
    raw: String,
    value: ParsedDate,
}

impl DateValue {
    pub fn parse(s: &str) -> Result<DateValue, DateTimeParseError> {
        let value = parse_date_or_datetime(s)?;
        Ok(DateValue {
            raw: s.to_string(),
            value,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> ParsedDate {
        self.value
    }

    pub fn has_time(&self) -> bool {
        !matches!(self.value, ParsedDate::Date(_))
    }
}

/// Value of a date mention: a single date or a range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: DateValue,
    /// End of the range; `None` when the value is a single date.
    pub end: Option<DateValue>,
    /// IANA time zone applying to `start` and `end`.
    pub time_zone: Option<String>,
}

impl DateRange {
    pub fn single(start: DateValue) -> Self {
        Self {
            start,
            end: None,
            time_zone: None,
        }
    }

    pub fn is_range(&self) -> bool {
        self.end.is_some()
    }
}

/// Reference to a user by id. The wire form is `{"object": "user", "id": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartialUser {
    pub id: String,
}

impl PartialUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Reference to a page or database by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub id: String,
}

impl ObjectRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
