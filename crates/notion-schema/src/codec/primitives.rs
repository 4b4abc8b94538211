//! Field-level access to JSON objects.
//!
//! [`Reader`] wraps one JSON object together with its location in the
//! document, so every failure it reports carries the full path of the
//! offending field. [`Writer`] builds objects for the serialize direction.

use serde_json::{Map, Value};

use crate::error::{ErrorKind, JsonType, Path, ValidationError};
use crate::model::enums::WireEnum;
use crate::model::value::{DateValue, Timestamp};

// =============================================================================
// DECODING
// =============================================================================

/// Reader over the members of a JSON object.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    object: &'a Map<String, Value>,
    path: Path,
}

impl<'a> Reader<'a> {
    /// Creates a reader; fails unless `value` is an object.
    pub fn new(value: &'a Value, path: Path) -> Result<Self, ValidationError> {
        match value {
            Value::Object(object) => Ok(Self { object, path }),
            other => Err(invalid_type(path, JsonType::Object, other)),
        }
    }

    /// Creates a reader over an already unwrapped object.
    pub fn from_map(object: &'a Map<String, Value>, path: Path) -> Self {
        Self { object, path }
    }

    /// Location of this object.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of one of this object's members.
    pub fn field_path(&self, key: &str) -> Path {
        self.path.key(key)
    }

    /// Returns the wrapped object.
    pub fn as_map(&self) -> &'a Map<String, Value> {
        self.object
    }

    /// Raw member lookup; `null` is returned as-is.
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key)
    }

    /// Member lookup treating `null` as absent.
    pub fn raw_non_null(&self, key: &str) -> Option<&'a Value> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Builds an error located at member `key`.
    pub fn error(&self, key: &str, kind: ErrorKind) -> ValidationError {
        ValidationError::new(self.field_path(key), kind)
    }

    /// Reads a required member of any type.
    pub fn read_value(&self, key: &str) -> Result<&'a Value, ValidationError> {
        self.object.get(key).ok_or_else(|| {
            self.error(key, ErrorKind::MissingField { field: key.to_string() })
        })
    }

    /// Reads a required string member.
    #[inline]
    pub fn read_str(&self, key: &str) -> Result<&'a str, ValidationError> {
        match self.read_value(key)? {
            Value::String(s) => Ok(s.as_str()),
            other => Err(invalid_type(self.field_path(key), JsonType::String, other)),
        }
    }

    /// Like [`read_str`](Self::read_str), returning an owned string.
    pub fn read_string(&self, key: &str) -> Result<String, ValidationError> {
        self.read_str(key).map(str::to_owned)
    }

    /// Reads an optional string member; absent and `null` both give `None`.
    pub fn read_opt_str(&self, key: &str) -> Result<Option<&'a str>, ValidationError> {
        match self.raw_non_null(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(invalid_type(self.field_path(key), JsonType::String, other)),
        }
    }

    /// Like [`read_opt_str`](Self::read_opt_str), returning an owned string.
    pub fn read_opt_string(&self, key: &str) -> Result<Option<String>, ValidationError> {
        Ok(self.read_opt_str(key)?.map(str::to_owned))
    }

    /// Reads a required boolean member.
    pub fn read_bool(&self, key: &str) -> Result<bool, ValidationError> {
        match self.read_value(key)? {
            Value::Bool(b) => Ok(*b),
            other => Err(invalid_type(self.field_path(key), JsonType::Bool, other)),
        }
    }

    /// Reads a nested object member.
    pub fn read_object(&self, key: &str) -> Result<Reader<'a>, ValidationError> {
        Reader::new(self.read_value(key)?, self.field_path(key))
    }

    /// Reads an optional nested object; absent and `null` both give `None`.
    pub fn read_opt_object(&self, key: &str) -> Result<Option<Reader<'a>>, ValidationError> {
        self.raw_non_null(key)
            .map(|value| Reader::new(value, self.field_path(key)))
            .transpose()
    }

    /// Reads an array member, returning its items and location.
    pub fn read_array(&self, key: &str) -> Result<(&'a [Value], Path), ValidationError> {
        match self.read_value(key)? {
            Value::Array(items) => Ok((items.as_slice(), self.field_path(key))),
            other => Err(invalid_type(self.field_path(key), JsonType::Array, other)),
        }
    }

    /// Reads a member of a closed enumeration.
    pub fn read_enum<E: WireEnum>(&self, key: &str) -> Result<E, ValidationError> {
        let s = self.read_str(key)?;
        E::parse_wire(s).map_err(|kind| self.error(key, kind))
    }

    /// Requires a string member to equal `expected`.
    pub fn expect_literal(&self, key: &str, expected: &str) -> Result<(), ValidationError> {
        let value = self.read_value(key)?;
        if value.as_str() == Some(expected) {
            return Ok(());
        }
        Err(self.error(
            key,
            ErrorKind::InvalidLiteral {
                field: key.to_string(),
                expected: format!("{expected:?}"),
                actual: value.to_string(),
            },
        ))
    }

    /// Reads an RFC 3339 instant.
    pub fn read_timestamp(&self, key: &str) -> Result<Timestamp, ValidationError> {
        let s = self.read_str(key)?;
        Timestamp::parse(s).map_err(|_| self.invalid_timestamp(key, s))
    }

    /// Reads an ISO 8601 date or date-time.
    pub fn read_date(&self, key: &str) -> Result<DateValue, ValidationError> {
        let s = self.read_str(key)?;
        DateValue::parse(s).map_err(|_| self.invalid_timestamp(key, s))
    }

    /// Reads an optional ISO 8601 date; absent and `null` both give `None`.
    pub fn read_opt_date(&self, key: &str) -> Result<Option<DateValue>, ValidationError> {
        match self.read_opt_str(key)? {
            None => Ok(None),
            Some(s) => DateValue::parse(s).map(Some).map_err(|_| self.invalid_timestamp(key, s)),
        }
    }

    fn invalid_timestamp(&self, key: &str, value: &str) -> ValidationError {
        self.error(
            key,
            ErrorKind::InvalidTimestamp {
                field: key.to_string(),
                value: value.to_string(),
            },
        )
    }
}

pub(crate) fn invalid_type(path: Path, expected: JsonType, found: &Value) -> ValidationError {
    ValidationError::new(
        path,
        ErrorKind::InvalidType {
            expected,
            found: JsonType::of(found),
        },
    )
}

/// Iterates over the items of a JSON array value, pairing each with its path.
pub fn array_items(
    value: &Value,
    path: Path,
) -> Result<impl Iterator<Item = (&Value, Path)>, ValidationError> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .map(move |(i, item)| (item, path.index(i)))),
        other => Err(invalid_type(path, JsonType::Array, other)),
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Builder for a JSON object.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    object: Map<String, Value>,
}

impl Writer {
    /// Creates a writer for an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a string member.
    pub fn write_str(&mut self, key: &str, value: &str) -> &mut Self {
        self.object.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Writes the member only when `value` is present.
    pub fn write_opt_str(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.write_str(key, value);
        }
        self
    }

    /// Writes a boolean member.
    pub fn write_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.object.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Writes the wire name of an enumeration member.
    pub fn write_enum<E: WireEnum>(&mut self, key: &str, value: E) -> &mut Self {
        self.write_str(key, value.as_str())
    }

    /// Writes an arbitrary JSON member, replacing any earlier value.
    pub fn write_value(&mut self, key: &str, value: Value) -> &mut Self {
        self.object.insert(key.to_string(), value);
        self
    }

    /// Writes `{"type": tag, tag: payload}`, the shape every tagged union uses.
    pub fn write_tagged(&mut self, tag: &str, payload: Value) -> &mut Self {
        self.write_str("type", tag);
        self.write_value(tag, payload)
    }

    /// Returns the built object, leaving the writer empty.
    pub fn finish(&mut self) -> Value {
        Value::Object(std::mem::take(&mut self.object))
    }
}
