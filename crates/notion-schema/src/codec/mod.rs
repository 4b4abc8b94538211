//! JSON encoding/decoding for schema objects.
//!
//! Every `parse_*` function validates a [`serde_json::Value`] and returns
//! typed values or path-tagged errors; every `serialize_*` function is its
//! inverse. Single resources fail fast with a [`ValidationError`]; composite
//! ones (rich text, schemas, databases) collect a [`ValidationErrors`] list.
//!
//! [`ValidationError`]: crate::error::ValidationError
//! [`ValidationErrors`]: crate::error::ValidationErrors

pub mod database;
pub mod dispatch;
pub mod file;
pub mod options;
pub mod parent;
pub mod primitives;
pub mod property;
pub mod rich_text;

use serde_json::Value;

use crate::model::database::{Database, Schema};
use crate::model::file::{FileReference, Icon};
use crate::model::parent::ParentReference;
use crate::model::property::PropertyDefinition;
use crate::model::rich_text::{RichText, RichTextSpan};

pub use database::{parse_database, parse_database_with_options, serialize_database};
pub use dispatch::{dispatch, read_discriminant, tagged_payload};
pub use file::{parse_file, parse_icon, serialize_file, serialize_icon};
pub use options::{AnnotationPolicy, ParseOptions};
pub use parent::{parse_parent, serialize_parent};
pub use primitives::{array_items, Reader, Writer};
pub use property::{
    parse_property_definition, parse_schema,
    parse_schema_with_options, serialize_property_definition, serialize_schema,
};
pub use rich_text::{
    parse_rich_text, parse_rich_text_span, parse_rich_text_with_options, serialize_rich_text,
    serialize_rich_text_span,
};

/// Implements serde traits by delegating to the codec, so deserializing
/// through serde applies the same validation as the `parse_*` functions.
macro_rules! impl_serde_via_codec {
    ($ty:ty, $parse:path, $serialize:path) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&$serialize(self), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <Value as serde::Deserialize>::deserialize(deserializer)?;
                $parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_serde_via_codec!(RichText, parse_rich_text, serialize_rich_text);
impl_serde_via_codec!(RichTextSpan, parse_rich_text_span, serialize_rich_text_span);
impl_serde_via_codec!(PropertyDefinition, parse_property_definition, serialize_property_definition);
impl_serde_via_codec!(Schema, parse_schema, serialize_schema);
impl_serde_via_codec!(ParentReference, parse_parent, serialize_parent);
impl_serde_via_codec!(FileReference, parse_file, serialize_file);
impl_serde_via_codec!(Icon, parse_icon, serialize_icon);
impl_serde_via_codec!(Database, parse_database, serialize_database);
