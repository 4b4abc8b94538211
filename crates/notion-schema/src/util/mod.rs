//! Utility modules.

pub mod datetime;

pub use datetime::{
    format_datetime, format_datetime_utc, parse_date_or_datetime, parse_datetime,
    DateTimeParseError, ParsedDate,
};
