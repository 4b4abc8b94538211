//! Notion-style database schemas: a typed codec and validator.
//!
//! This crate turns the JSON objects of a Notion-style API (databases,
//! property schemas, rich text, mentions, parents, files) into strongly
//! typed Rust values and back.
//!
//! # Overview
//!
//! Every polymorphic object in the wire format names its variant in a
//! `type` member. Parsing:
//! - **Dispatches on `type`** against a closed tag set; unknown tags are
//!   rejected, never dropped
//! - **Validates every field** of the matched variant, including closed
//!   enumerations such as colors and number formats
//! - **Reports paths**: each error locates the offending field, e.g.
//!   `properties.Status.type` or `title[3].mention.type`
//!
//! Serializing reproduces the wire shape, so well-formed input survives a
//! parse and serialize round trip.
//!
//! # Quick Start
//!
//! ```rust
//! use notion_schema::{parse_property_definition, serialize_property_definition, NumberFormat};
//! use serde_json::json;
//!
//! let raw = json!({"type": "number", "id": "abc", "name": "Price", "format": "dollar"});
//! let price = parse_property_definition(&raw).unwrap();
//! assert_eq!(price.number_format(), Some(NumberFormat::Dollar));
//! assert_eq!(serialize_property_definition(&price), raw);
//!
//! let raw = json!({"type": "number", "id": "abc", "name": "Price", "format": "bitcoin"});
//! let err = parse_property_definition(&raw).unwrap_err();
//! assert_eq!(err.path.to_string(), "format");
//! ```
//!
//! # Modules
//!
//! - [`model`]: Typed values (rich text, properties, schemas, databases) and builders
//! - [`codec`]: JSON parsing and serialization with path-tagged errors
//! - [`validate`]: Cross-reference checks between schemas
//! - [`error`]: Error types
//! - [`util`]: Date and time helpers
//!
//! # Errors
//!
//! Single objects (a property, a parent, a file) fail fast with one
//! [`ValidationError`]. Composite objects (rich text, schemas, databases)
//! keep going and return every failure as [`ValidationErrors`], in
//! document order. Nothing panics on malformed input.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (dispatch decisions at `trace`,
//! rejected composites and payloads accepted without validation at
//! `debug`, malformed unvalidated payloads at `warn`) and never installs
//! a subscriber.

pub mod codec;
pub mod error;
pub mod model;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    parse_database, parse_database_with_options, parse_file, parse_icon, parse_parent,
    parse_property_definition, parse_rich_text,
    parse_rich_text_with_options, parse_schema, parse_schema_with_options, serialize_database,
    serialize_file, serialize_icon, serialize_parent, serialize_property_definition,
    serialize_rich_text, serialize_schema, AnnotationPolicy, ParseOptions,
};
pub use error::{ErrorKind, Path, PropertyLabel, ReferenceError, ValidationError, ValidationErrors};
pub use model::{
    AnnotationColor, Annotations, BackgroundColor, Color, Database, DateRange, FileReference,
    Fingerprint, Icon, Mention, NumberFormat, ParentReference, PropertyConfig, PropertyDefinition,
    PropertyKind, RichText, RichTextBuilder, RichTextSpan, RollupConfig, RollupFunction, Schema,
    SchemaBuilder, SpanContent, TemplateMention, WireEnum,
};
pub use validate::{validate_database, validate_file_expiry, validate_rollups, SchemaContext};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
