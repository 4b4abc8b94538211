//! Error types for schema parsing and cross-reference validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::model::PropertyKind;

/// One step in the location of a field inside a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member.
    Key(String),
    /// Array element.
    Index(usize),
}

/// Location of a field inside a JSON document.
///
/// Renders as `properties.Status.type` or `title[3].mention.type`. The
/// document root renders as `$`. Keys that are empty or contain `.`, `[`,
/// `]` or `"` render bracket-quoted, e.g. `properties["Price.USD"].type`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns this path extended with an object member.
    pub fn key(&self, key: impl Into<String>) -> Path {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Path(segments)
    }

    /// Returns this path extended with an array index.
    pub fn index(&self, index: usize) -> Path {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Path(segments)
    }

    /// Returns true if this path names the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the segments from the root down.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if needs_quoting(key) => write!(f, "[{key:?}]")?,
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']', '"'])
}

impl From<&str> for Path {
    /// Builds a path of object members from a dotted string. Index
    /// segments are not recognised; use [`Path::index`] for those.
    fn from(dotted: &str) -> Self {
        Path(
            dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(|s| PathSegment::Key(s.to_string()))
                .collect(),
        )
    }
}

/// JSON value categories, used to describe type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Returns the category of `value`.
    pub fn of(value: &Value) -> JsonType {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Bool,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JsonType::Null => "null",
            JsonType::Bool => "boolean",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        })
    }
}

/// What went wrong at a given path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("missing discriminant field")]
    MissingDiscriminant,

    #[error("unknown {kind} variant {tag:?}")]
    UnknownVariant { kind: &'static str, tag: String },

    #[error("unknown {enum_name} value {value:?}")]
    UnknownEnumValue {
        enum_name: &'static str,
        value: String,
    },

    #[error("missing required field {field:?}")]
    MissingField { field: String },

    #[error("invalid literal for {field:?}: expected {expected}, found {actual}")]
    InvalidLiteral {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("invalid timestamp in {field:?}: {value:?}")]
    InvalidTimestamp { field: String, value: String },

    #[error("{kind} payload belongs under {expected_payload_key:?} and nowhere else")]
    ShapeMismatch {
        kind: &'static str,
        expected_payload_key: String,
    },

    #[error("expected {expected}, found {found}")]
    InvalidType { expected: JsonType, found: JsonType },

    #[error("duplicate property id {id:?}")]
    DuplicateIdentifier { id: String },
}

impl ErrorKind {
    /// Stable machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingDiscriminant => "missing_discriminant",
            ErrorKind::UnknownVariant { .. } => "unknown_variant",
            ErrorKind::UnknownEnumValue { .. } => "unknown_enum_value",
            ErrorKind::MissingField { .. } => "missing_field",
            ErrorKind::InvalidLiteral { .. } => "invalid_literal",
            ErrorKind::InvalidTimestamp { .. } => "invalid_timestamp",
            ErrorKind::ShapeMismatch { .. } => "shape_mismatch",
            ErrorKind::InvalidType { .. } => "invalid_type",
            ErrorKind::DuplicateIdentifier { .. } => "duplicate_identifier",
        }
    }
}

/// Identifies the property a failure belongs to, as far as it could be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyLabel {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl fmt::Display for PropertyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, &self.id) {
            (Some(name), Some(id)) => write!(f, "{name:?} (id {id:?})"),
            (Some(name), None) => write!(f, "{name:?}"),
            (None, Some(id)) => write!(f, "id {id:?}"),
            (None, None) => f.write_str("<unnamed>"),
        }
    }
}

/// A single structural violation, located by path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}: {detail}")]
pub struct ValidationError {
    pub path: Path,
    pub kind: ErrorKind,
    pub detail: String,
    /// The property being parsed when the failure occurred, if any.
    pub property: Option<PropertyLabel>,
}

impl ValidationError {
    /// Creates an error at `path`, rendering `kind` as its detail.
    pub fn new(path: Path, kind: ErrorKind) -> Self {
        let detail = kind.to_string();
        Self {
            path,
            kind,
            detail,
            property: None,
        }
    }

    /// Attaches the property label unless one is already present.
    pub fn with_property(mut self, label: PropertyLabel) -> Self {
        if self.property.is_none() {
            self.detail = format!("{} (property {label})", self.detail);
            self.property = Some(label);
        }
        self
    }

    /// Returns the stable code of the error kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Ordered list of failures from a composite parse.
///
/// Returned inside `Err` only when at least one failure was recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one failure.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Appends every failure of `other`, keeping order.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    /// Returns the number of failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the failures in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Returns the first failure, if any.
    pub fn first(&self) -> Option<&ValidationError> {
        self.0.first()
    }

    /// Consumes the list into its failures.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    /// Records the error of `result`, returning its value if there was one.
    pub(crate) fn collect<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.push(e);
                None
            }
        }
    }

    /// Like [`collect`](Self::collect) for results that already carry a list.
    pub(crate) fn collect_all<T>(&mut self, result: Result<T, ValidationErrors>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.extend(e);
                None
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Error during cross-reference validation against a [`SchemaContext`](crate::SchemaContext).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("rollup {rollup:?} references relation property id {relation_id:?}, which is not in the schema")]
    RelationNotFound { rollup: String, relation_id: String },

    #[error("rollup {rollup:?} names relation property {expected:?} but id {relation_id:?} belongs to {actual:?}")]
    RelationNameMismatch {
        rollup: String,
        relation_id: String,
        expected: String,
        actual: String,
    },

    #[error("rollup {rollup:?} references {relation_id:?}, a {kind} property rather than a relation")]
    NotARelation {
        rollup: String,
        relation_id: String,
        kind: PropertyKind,
    },

    #[error("rollup {rollup:?} references property id {property_id:?}, which is not in database {database_id:?}")]
    RollupTargetNotFound {
        rollup: String,
        property_id: String,
        database_id: String,
    },

    #[error("rollup {rollup:?} names rollup property {expected:?} but id {property_id:?} belongs to {actual:?}")]
    RollupNameMismatch {
        rollup: String,
        property_id: String,
        expected: String,
        actual: String,
    },

    #[error("hosted file URL expired at {expired_at}")]
    FileExpired { expired_at: DateTime<Utc> },
}
