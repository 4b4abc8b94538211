//! Discriminated-union dispatch.
//!
//! Every polymorphic resource in the wire format names its variant in a
//! discriminant member (`type`). [`dispatch`] reads that member against a
//! closed tag set and hands the object to the parser for the matched
//! variant. Sub-parsers receive the same [`Reader`], so nested failures
//! keep the full path of the field that caused them.

use serde_json::Value;

use crate::codec::primitives::{invalid_type, Reader};
use crate::error::{ErrorKind, JsonType, ValidationError};
use crate::model::enums::WireEnum;

/// Reads the discriminant member `field` of `reader`.
///
/// `family` names the union in `UnknownVariant` errors (`"property"`,
/// `"richText"`, `"mention"`, ...).
pub fn read_discriminant<K: WireEnum>(
    reader: &Reader<'_>,
    field: &str,
    family: &'static str,
) -> Result<K, ValidationError> {
    let tag = match reader.raw(field) {
        None | Some(Value::Null) => {
            return Err(reader.error(field, ErrorKind::MissingDiscriminant));
        }
        Some(Value::String(tag)) => tag,
        Some(other) => return Err(invalid_type(reader.field_path(field), JsonType::String, other)),
    };
    K::from_wire(tag).ok_or_else(|| {
        reader.error(
            field,
            ErrorKind::UnknownVariant {
                kind: family,
                tag: tag.clone(),
            },
        )
    })
}

/// Reads the `type` discriminant and invokes `parse` with the matched tag.
///
/// `parse` is expected to `match` exhaustively on the tag, so adding a
/// member to the tag set is a compile error until every parser handles it.
pub fn dispatch<'a, K, T, F>(reader: &Reader<'a>, family: &'static str, parse: F) -> Result<T, ValidationError>
where
    K: WireEnum,
    F: FnOnce(K, &Reader<'a>) -> Result<T, ValidationError>,
{
    let tag = read_discriminant::<K>(reader, "type", family)?;
    tracing::trace!(family, tag = tag.as_str(), path = %reader.path(), "dispatching variant");
    parse(tag, reader)
}

/// Reads the payload object stored under the variant's own tag, as in
/// `{"type": "external", "external": {...}}`.
pub fn tagged_payload<'a, K: WireEnum>(reader: &Reader<'a>, tag: K) -> Result<Reader<'a>, ValidationError> {
    reader.read_object(tag.as_str())
}
