//! Data model types.
//!
//! This module contains the typed values produced by the codec:
//! - Closed enumerations (colors, number formats, rollup functions)
//! - Rich text (spans, annotations, mentions)
//! - Property definitions and schemas
//! - Parent, file and icon references
//! - Database objects
//! - Builders (ergonomic construction)

pub mod builder;
pub mod database;
pub mod enums;
pub mod file;
pub mod id;
pub mod parent;
pub mod property;
pub mod rich_text;
pub mod value;

pub use builder::{RichTextBuilder, RollupBuilder, SchemaBuilder, SpanBuilder};
pub use database::{Database, Schema};
pub use enums::{
    AnnotationColor, BackgroundColor, Color, NumberFormat, RollupFunction, TemplateMentionDate,
    WireEnum,
};
pub use file::{ExternalFile, FileKind, FileReference, HostedFile, Icon, IconKind};
pub use id::{format_object_id, normalize_object_id, parse_object_id, same_object_id, Fingerprint};
pub use parent::{ParentKind, ParentReference};
pub use property::{
    FormulaConfig, OpaquePayload, PropertyConfig, PropertyDefinition, PropertyKind, RollupConfig,
    SelectConfig, SelectOption, UnspecifiedPayload,
};
pub use rich_text::{
    Annotations, Equation, Link, Mention, MentionKind, RichText, RichTextKind, RichTextSpan,
    SpanContent, TemplateMention, TemplateMentionKind, TextContent,
};
pub use value::{DateRange, DateValue, ObjectRef, PartialUser, Timestamp};
