//! Database object encoding/decoding.

use serde_json::Value;

use crate::codec::file::{parse_file_at, parse_icon_at, serialize_file, serialize_icon};
use crate::codec::options::ParseOptions;
use crate::codec::parent::{parse_parent_at, serialize_parent};
use crate::codec::primitives::{Reader, Writer};
use crate::codec::property::{parse_schema_at, serialize_schema};
use crate::codec::rich_text::{parse_partial_user, parse_rich_text_at, serialize_partial_user, serialize_rich_text};
use crate::error::{Path, ValidationError, ValidationErrors};
use crate::model::database::Database;
use crate::model::rich_text::RichText;
use crate::model::value::PartialUser;

const OBJECT: &str = "database";

// =============================================================================
// DECODING
// =============================================================================

/// Parses a database object.
///
/// Fail-soft: every failing top-level field, rich-text span and property
/// is reported, in document order.
pub fn parse_database(raw: &Value) -> Result<Database, ValidationErrors> {
    parse_database_with_options(raw, &ParseOptions::default())
}

pub fn parse_database_with_options(raw: &Value, options: &ParseOptions) -> Result<Database, ValidationErrors> {
    let reader = Reader::new(raw, Path::root())?;
    let mut errors = ValidationErrors::new();

    errors.collect(reader.expect_literal("object", OBJECT));
    let id = errors.collect(reader.read_string("id"));
    let created_time = errors.collect(reader.read_timestamp("created_time"));
    let created_by = errors.collect(read_user(&reader, "created_by"));
    let last_edited_time = errors.collect(reader.read_timestamp("last_edited_time"));
    let last_edited_by = errors.collect(read_user(&reader, "last_edited_by"));
    let title = errors.collect_all(read_rich_text(&reader, "title", options));
    let description = errors.collect_all(read_rich_text(&reader, "description", options));
    let icon = errors.collect(
        reader
            .raw_non_null("icon")
            .map(|v| parse_icon_at(v, reader.field_path("icon")))
            .transpose(),
    );
    let cover = errors.collect(
        reader
            .raw_non_null("cover")
            .map(|v| parse_file_at(v, reader.field_path("cover")))
            .transpose(),
    );
    let properties = errors.collect_all(
        reader
            .read_value("properties")
            .map_err(ValidationErrors::from)
            .and_then(|v| parse_schema_at(v, reader.field_path("properties"), options)),
    );
    let parent = errors.collect(
        reader
            .read_value("parent")
            .and_then(|v| parse_parent_at(v, reader.field_path("parent"))),
    );
    let url = errors.collect(reader.read_string("url"));
    let archived = errors.collect(reader.read_bool("archived"));
    let is_inline = errors.collect(reader.read_bool("is_inline"));

    if !errors.is_empty() {
        tracing::debug!(failed = errors.len(), "database rejected");
        return Err(errors);
    }

    match (
        id,
        created_time,
        created_by,
        last_edited_time,
        last_edited_by,
        title,
        description,
        icon,
        cover,
        properties,
        parent,
        url,
        archived,
        is_inline,
    ) {
        (
            Some(id),
            Some(created_time),
            Some(created_by),
            Some(last_edited_time),
            Some(last_edited_by),
            Some(title),
            Some(description),
            Some(icon),
            Some(cover),
            Some(properties),
            Some(parent),
            Some(url),
            Some(archived),
            Some(is_inline),
        ) => Ok(Database {
            id,
            created_time,
            created_by,
            last_edited_time,
            last_edited_by,
            title,
            description,
            icon,
            cover,
            properties,
            parent,
            url,
            archived,
            is_inline,
        }),
        // Every None above recorded an error
        _ => Err(errors),
    }
}

fn read_user(reader: &Reader<'_>, key: &str) -> Result<PartialUser, ValidationError> {
    parse_partial_user(&reader.read_object(key)?)
}

fn read_rich_text(
    reader: &Reader<'_>,
    key: &str,
    options: &ParseOptions,
) -> Result<RichText, ValidationErrors> {
    let raw = reader.read_value(key)?;
    parse_rich_text_at(raw, reader.field_path(key), options)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Serializes a database object. Absent icon and cover are omitted.
pub fn serialize_database(database: &Database) -> Value {
    let mut writer = Writer::new();
    writer
        .write_str("object", OBJECT)
        .write_str("id", &database.id)
        .write_str("created_time", database.created_time.as_str())
        .write_value("created_by", serialize_partial_user(&database.created_by))
        .write_str("last_edited_time", database.last_edited_time.as_str())
        .write_value("last_edited_by", serialize_partial_user(&database.last_edited_by))
        .write_value("title", serialize_rich_text(&database.title))
        .write_value("description", serialize_rich_text(&database.description));
    if let Some(icon) = &database.icon {
        writer.write_value("icon", serialize_icon(icon));
    }
    if let Some(cover) = &database.cover {
        writer.write_value("cover", serialize_file(cover));
    }
    writer
        .write_value("properties", serialize_schema(&database.properties))
        .write_value("parent", serialize_parent(&database.parent))
        .write_str("url", &database.url)
        .write_bool("archived", database.archived)
        .write_bool("is_inline", database.is_inline);
    writer.finish()
}
