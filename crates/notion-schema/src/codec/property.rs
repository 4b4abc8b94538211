//! Property definition and schema encoding/decoding.
//!
//! A property is a flat object whose `type` names the kind; kind-specific
//! settings live under a member named after the kind, except `number`
//! which keeps `format` at the top level:
//!
//! ```json
//! { "id": "%3AUPp", "name": "Tags", "type": "multi_select",
//!   "multi_select": { "options": [ { "id": "1", "name": "a", "color": "red" } ] } }
//! ```

use serde_json::{json, Map, Value};

use crate::codec::dispatch::{dispatch, tagged_payload};
use crate::codec::options::ParseOptions;
use crate::codec::primitives::{Reader, Writer};
use crate::error::{ErrorKind, JsonType, Path, PropertyLabel, ValidationError, ValidationErrors};
use crate::model::database::Schema;
use crate::model::enums::{Color, NumberFormat, RollupFunction};
use crate::model::id::Fingerprint;
use crate::model::property::{
    FormulaConfig, OpaquePayload, PropertyConfig, PropertyDefinition, PropertyKind, RollupConfig,
    SelectConfig, SelectOption, UnspecifiedPayload,
};

// =============================================================================
// DECODING
// =============================================================================

/// Parses one property definition.
///
/// Fail-fast: the first violation is returned, labelled with the
/// property's id and name when those could be read.
///
/// No [`ParseOptions`] field applies to a single property; options only
/// affect schemas and rich text.
pub fn parse_property_definition(raw: &Value) -> Result<PropertyDefinition, ValidationError> {
    parse_property_at(raw, Path::root())
}

pub(crate) fn parse_property_at(raw: &Value, path: Path) -> Result<PropertyDefinition, ValidationError> {
    let reader = Reader::new(raw, path)?;
    let label = PropertyLabel {
        id: reader.raw("id").and_then(Value::as_str).map(str::to_owned),
        name: reader.raw("name").and_then(Value::as_str).map(str::to_owned),
    };

    parse_property(&reader).map_err(|e| e.with_property(label))
}

fn parse_property(reader: &Reader<'_>) -> Result<PropertyDefinition, ValidationError> {
    dispatch(reader, "property", |kind: PropertyKind, r| {
        let id = r.read_string("id")?;
        let name = r.read_string("name")?;
        let config = parse_config(kind, r)?;
        reject_stray_payloads(kind, r)?;
        Ok(PropertyDefinition { id, name, config })
    })
}

/// Member holding the kind-specific settings.
fn payload_key(kind: PropertyKind) -> &'static str {
    match kind {
        PropertyKind::Number => "format",
        other => other.as_str(),
    }
}

/// A property carries exactly one payload: members named after another
/// kind, or a `format` outside `number`, would be dropped on serialize.
fn reject_stray_payloads(kind: PropertyKind, reader: &Reader<'_>) -> Result<(), ValidationError> {
    let expected = payload_key(kind);
    let stray = reader
        .as_map()
        .keys()
        .find(|key| key.as_str() != expected && (key.as_str() == "format" || PropertyKind::from_wire(key).is_some()));

    match stray {
        Some(key) => Err(reader.error(
            key,
            ErrorKind::ShapeMismatch {
                kind: kind.as_str(),
                expected_payload_key: expected.to_string(),
            },
        )),
        None => Ok(()),
    }
}

fn parse_config(kind: PropertyKind, reader: &Reader<'_>) -> Result<PropertyConfig, ValidationError> {
    let config = match kind {
        PropertyKind::Number => PropertyConfig::Number {
            format: reader.read_enum::<NumberFormat>("format")?,
        },
        PropertyKind::Select => PropertyConfig::Select(parse_select(&tagged_payload(reader, kind)?)?),
        PropertyKind::MultiSelect => {
            PropertyConfig::MultiSelect(parse_select(&tagged_payload(reader, kind)?)?)
        }
        PropertyKind::Formula => {
            let payload = tagged_payload(reader, kind)?;
            PropertyConfig::Formula(FormulaConfig {
                expression: payload.read_string("expression")?,
            })
        }
        PropertyKind::Rollup => PropertyConfig::Rollup(parse_rollup(&tagged_payload(reader, kind)?)?),
        PropertyKind::Status => PropertyConfig::Status(unspecified_payload(reader, kind)),
        PropertyKind::Relation => PropertyConfig::Relation(unspecified_payload(reader, kind)),
        PropertyKind::Title => PropertyConfig::Title(marker_payload(reader, kind)?),
        PropertyKind::RichText => PropertyConfig::RichText(marker_payload(reader, kind)?),
        PropertyKind::Date => PropertyConfig::Date(marker_payload(reader, kind)?),
        PropertyKind::People => PropertyConfig::People(marker_payload(reader, kind)?),
        PropertyKind::Files => PropertyConfig::Files(marker_payload(reader, kind)?),
        PropertyKind::Checkbox => PropertyConfig::Checkbox(marker_payload(reader, kind)?),
        PropertyKind::Url => PropertyConfig::Url(marker_payload(reader, kind)?),
        PropertyKind::Email => PropertyConfig::Email(marker_payload(reader, kind)?),
        PropertyKind::PhoneNumber => PropertyConfig::PhoneNumber(marker_payload(reader, kind)?),
        PropertyKind::CreatedTime => PropertyConfig::CreatedTime(marker_payload(reader, kind)?),
        PropertyKind::CreatedBy => PropertyConfig::CreatedBy(marker_payload(reader, kind)?),
        PropertyKind::LastEditedTime => PropertyConfig::LastEditedTime(marker_payload(reader, kind)?),
        PropertyKind::LastEditedBy => PropertyConfig::LastEditedBy(marker_payload(reader, kind)?),
    };
    Ok(config)
}

/// Marker kinds require their same-named member to be an object.
fn marker_payload(reader: &Reader<'_>, kind: PropertyKind) -> Result<OpaquePayload, ValidationError> {
    match reader.raw(kind.as_str()) {
        Some(Value::Object(map)) => Ok(OpaquePayload(map.clone())),
        _ => Err(reader.error(
            kind.as_str(),
            ErrorKind::ShapeMismatch {
                kind: kind.as_str(),
                expected_payload_key: kind.as_str().to_string(),
            },
        )),
    }
}

fn unspecified_payload(reader: &Reader<'_>, kind: PropertyKind) -> UnspecifiedPayload {
    let raw = reader.raw(kind.as_str()).cloned();
    match &raw {
        None | Some(Value::Object(_)) => tracing::debug!(
            kind = kind.as_str(),
            path = %reader.path(),
            has_payload = raw.is_some(),
            "accepting property kind with unspecified payload verbatim"
        ),
        Some(other) => tracing::warn!(
            kind = kind.as_str(),
            path = %reader.path(),
            found = %JsonType::of(other),
            "accepting non-object payload verbatim"
        ),
    }
    UnspecifiedPayload(raw)
}

fn parse_select(reader: &Reader<'_>) -> Result<SelectConfig, ValidationError> {
    let (items, path) = reader.read_array("options")?;
    let options = items
        .iter()
        .enumerate()
        .map(|(i, item)| -> Result<SelectOption, ValidationError> {
            let option = Reader::new(item, path.index(i))?;
            Ok(SelectOption {
                id: option.read_string("id")?,
                name: option.read_string("name")?,
                color: option.read_enum::<Color>("color")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SelectConfig { options })
}

fn parse_rollup(reader: &Reader<'_>) -> Result<RollupConfig, ValidationError> {
    Ok(RollupConfig {
        rollup_property_name: reader.read_string("rollup_property_name")?,
        relation_property_name: reader.read_string("relation_property_name")?,
        rollup_property_id: reader.read_string("rollup_property_id")?,
        relation_property_id: reader.read_string("relation_property_id")?,
        function: reader.read_enum::<RollupFunction>("function")?,
    })
}

/// Parses a `properties` map (property name to definition).
///
/// Fail-soft: every failing property contributes one error, prefixed with
/// its map key. Property ids must be unique across the schema.
pub fn parse_schema(raw: &Value) -> Result<Schema, ValidationErrors> {
    parse_schema_with_options(raw, &ParseOptions::default())
}

pub fn parse_schema_with_options(raw: &Value, options: &ParseOptions) -> Result<Schema, ValidationErrors> {
    parse_schema_at(raw, Path::root(), options)
}

pub(crate) fn parse_schema_at(raw: &Value, path: Path, options: &ParseOptions) -> Result<Schema, ValidationErrors> {
    let reader = Reader::new(raw, path)?;
    let mut errors = ValidationErrors::new();
    let mut schema = Schema::new();

    for (key, value) in reader.as_map() {
        let entry_path = reader.field_path(key);
        let Some(property) = errors.collect(parse_property_at(value, entry_path.clone())) else {
            continue;
        };

        if property.name != *key {
            if options.check_schema_keys {
                errors.push(
                    ValidationError::new(
                        entry_path.key("name"),
                        ErrorKind::InvalidLiteral {
                            field: "name".to_string(),
                            expected: format!("{key:?}"),
                            actual: format!("{:?}", property.name),
                        },
                    )
                    .with_property(property.label()),
                );
                continue;
            }
            tracing::warn!(key = key.as_str(), name = property.name.as_str(), "schema key differs from property name");
        }

        if schema.contains_id(&property.id) {
            errors.push(
                ValidationError::new(entry_path.key("id"), ErrorKind::DuplicateIdentifier { id: property.id.clone() })
                    .with_property(property.label()),
            );
            continue;
        }

        schema.insert(key.as_str(), property);
    }

    if errors.is_empty() {
        Ok(schema)
    } else {
        tracing::debug!(failed = errors.len(), parsed = schema.len(), "schema rejected");
        Err(errors)
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Serializes a property definition back to its wire object.
pub fn serialize_property_definition(property: &PropertyDefinition) -> Value {
    let mut writer = Writer::new();
    writer.write_str("id", &property.id).write_str("name", &property.name);

    let kind = property.kind();
    match &property.config {
        PropertyConfig::Number { format } => {
            writer.write_str("type", kind.as_str()).write_enum("format", *format);
        }
        PropertyConfig::Select(select) | PropertyConfig::MultiSelect(select) => {
            writer.write_tagged(kind.as_str(), serialize_select(select));
        }
        PropertyConfig::Formula(formula) => {
            writer.write_tagged(kind.as_str(), json!({ "expression": formula.expression }));
        }
        PropertyConfig::Rollup(rollup) => {
            writer.write_tagged(kind.as_str(), serialize_rollup(rollup));
        }
        PropertyConfig::Status(payload) | PropertyConfig::Relation(payload) => {
            writer.write_str("type", kind.as_str());
            if let Some(raw) = payload.raw() {
                writer.write_value(kind.as_str(), raw.clone());
            }
        }
        PropertyConfig::Title(payload)
        | PropertyConfig::RichText(payload)
        | PropertyConfig::Date(payload)
        | PropertyConfig::People(payload)
        | PropertyConfig::Files(payload)
        | PropertyConfig::Checkbox(payload)
        | PropertyConfig::Url(payload)
        | PropertyConfig::Email(payload)
        | PropertyConfig::PhoneNumber(payload)
        | PropertyConfig::CreatedTime(payload)
        | PropertyConfig::CreatedBy(payload)
        | PropertyConfig::LastEditedTime(payload)
        | PropertyConfig::LastEditedBy(payload) => {
            writer.write_tagged(kind.as_str(), Value::Object(payload.0.clone()));
        }
    }
    writer.finish()
}

fn serialize_select(select: &SelectConfig) -> Value {
    let options: Vec<Value> = select
        .options
        .iter()
        .map(|o| json!({ "id": o.id, "name": o.name, "color": o.color.as_str() }))
        .collect();
    json!({ "options": options })
}

fn serialize_rollup(rollup: &RollupConfig) -> Value {
    json!({
        "rollup_property_name": rollup.rollup_property_name,
        "relation_property_name": rollup.relation_property_name,
        "rollup_property_id": rollup.rollup_property_id,
        "relation_property_id": rollup.relation_property_id,
        "function": rollup.function.as_str(),
    })
}

/// Serializes a schema to its `properties` map.
pub fn serialize_schema(schema: &Schema) -> Value {
    let map: Map<String, Value> = schema
        .iter()
        .map(|(key, property)| (key.to_string(), serialize_property_definition(property)))
        .collect();
    Value::Object(map)
}

impl Schema {
    /// SHA-256 of the serialized schema.
    ///
    /// Object members serialize in sorted order, so two schemas that
    /// compare equal always share a fingerprint regardless of the member
    /// order they were read in.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(serialize_schema(self).to_string().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn base(kind: &str) -> Value {
        json!({"id": "p1", "name": "Column", "type": kind})
    }

    fn with(kind: &str, key: &str, payload: Value) -> Value {
        let mut raw = base(kind);
        raw[key] = payload;
        raw
    }

    fn well_formed(kind: PropertyKind) -> Value {
        let k = kind.as_str();
        match kind {
            PropertyKind::Number => with(k, "format", json!("number_with_commas")),
            PropertyKind::Select | PropertyKind::MultiSelect => with(
                k,
                k,
                json!({"options": [{"id": "o1", "name": "Done", "color": "green"}]}),
            ),
            PropertyKind::Formula => with(k, k, json!({"expression": "prop(\"Price\") * 2"})),
            PropertyKind::Rollup => with(
                k,
                k,
                json!({
                    "rollup_property_name": "Cost",
                    "relation_property_name": "Items",
                    "rollup_property_id": "r1",
                    "relation_property_id": "rel1",
                    "function": "sum"
                }),
            ),
            PropertyKind::Status | PropertyKind::Relation => base(k),
            _ => with(k, k, json!({})),
        }
    }

    #[test]
    fn test_every_kind_roundtrips() {
        for kind in PropertyKind::ALL {
            let raw = well_formed(*kind);
            let property = parse_property_definition(&raw)
                .unwrap_or_else(|e| panic!("{kind}: {e}"));
            assert_eq!(property.kind(), *kind);
            assert_eq!(property.id, "p1");
            assert_eq!(property.name, "Column");
            assert_eq!(serialize_property_definition(&property), raw, "{kind}");
        }
    }

    #[test]
    fn test_number_dollar() {
        let raw = json!({"type": "number", "id": "abc", "name": "Price", "format": "dollar"});
        let property = parse_property_definition(&raw).unwrap();
        assert_eq!(property.kind(), PropertyKind::Number);
        assert_eq!(property.number_format(), Some(NumberFormat::Dollar));
    }

    #[test]
    fn test_number_bitcoin_rejected() {
        let raw = json!({"type": "number", "id": "abc", "name": "Price", "format": "bitcoin"});
        let err = parse_property_definition(&raw).unwrap_err();
        assert_eq!(err.path.to_string(), "format");
        assert_eq!(
            err.kind,
            ErrorKind::UnknownEnumValue {
                enum_name: "NumberFormat",
                value: "bitcoin".to_string()
            }
        );
        let label = err.property.unwrap();
        assert_eq!(label.id.as_deref(), Some("abc"));
        assert_eq!(label.name.as_deref(), Some("Price"));
    }

    #[test]
    fn test_discriminant_errors() {
        let err = parse_property_definition(&json!({"id": "x", "name": "X"})).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingDiscriminant);
        assert_eq!(err.path.to_string(), "type");

        let err = parse_property_definition(&base("button")).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnknownVariant {
                kind: "property",
                tag: "button".to_string()
            }
        );
    }

    #[test]
    fn test_base_fields_required() {
        let raw = json!({"type": "checkbox", "name": "Done", "checkbox": {}});
        let err = parse_property_definition(&raw).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingField { field: "id".to_string() });
        assert_eq!(err.property.unwrap().name.as_deref(), Some("Done"));
    }

    #[test]
    fn test_marker_shape_mismatch() {
        for payload in [None, Some(json!(null)), Some(json!([])), Some(json!("yes"))] {
            let mut raw = base("checkbox");
            if let Some(payload) = payload {
                raw["checkbox"] = payload;
            }
            let err = parse_property_definition(&raw).unwrap_err();
            assert_eq!(
                err.kind,
                ErrorKind::ShapeMismatch {
                    kind: "checkbox",
                    expected_payload_key: "checkbox".to_string()
                }
            );
            assert_eq!(err.path.to_string(), "checkbox");
        }
    }

    #[test]
    fn test_stray_payload_rejected() {
        let mut raw = with("title", "title", json!({}));
        raw["rich_text"] = json!({});
        let err = parse_property_definition(&raw).unwrap_err();
        assert_eq!(err.path.to_string(), "rich_text");
        assert_eq!(
            err.kind,
            ErrorKind::ShapeMismatch {
                kind: "title",
                expected_payload_key: "title".to_string()
            }
        );
        assert_eq!(err.property.unwrap().name.as_deref(), Some("Column"));

        let mut raw = with("checkbox", "checkbox", json!({}));
        raw["format"] = json!("dollar");
        let err = parse_property_definition(&raw).unwrap_err();
        assert_eq!(err.path.to_string(), "format");

        let mut raw = well_formed(PropertyKind::Number);
        raw["number"] = json!({"format": "dollar"});
        let err = parse_property_definition(&raw).unwrap_err();
        assert_eq!(err.path.to_string(), "number");
        assert_eq!(
            err.kind,
            ErrorKind::ShapeMismatch {
                kind: "number",
                expected_payload_key: "format".to_string()
            }
        );

        // Unspecified kinds are held to the same rule
        let mut raw = base("status");
        raw["select"] = json!({"options": []});
        assert_eq!(parse_property_definition(&raw).unwrap_err().path.to_string(), "select");
    }

    #[test]
    fn test_stray_payload_in_schema_is_key_prefixed() {
        let mut raw = schema_fixture();
        raw["Name"]["rich_text"] = json!({});
        let errors = parse_schema_at(&raw, Path::from("properties"), &ParseOptions::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().unwrap().path.to_string(), "properties.Name.rich_text");
    }

    #[test]
    fn test_marker_contents_kept() {
        let raw = with("title", "title", json!({"extra": 1}));
        let property = parse_property_definition(&raw).unwrap();
        assert_eq!(serialize_property_definition(&property), raw);
    }

    #[test]
    fn test_unspecified_payload_kept_verbatim() {
        let raw = with("relation", "relation", json!({"database_id": "d1", "type": "single_property"}));
        let property = parse_property_definition(&raw).unwrap();
        match &property.config {
            PropertyConfig::Relation(payload) => assert!(payload.is_present()),
            other => panic!("expected relation, got {other:?}"),
        }
        assert_eq!(serialize_property_definition(&property), raw);
    }

    #[test]
    fn test_select_option_path() {
        let raw = with(
            "select",
            "select",
            json!({"options": [
                {"id": "1", "name": "a", "color": "red"},
                {"id": "2", "name": "b", "color": "teal"}
            ]}),
        );
        let err = parse_property_definition(&raw).unwrap_err();
        assert_eq!(err.path.to_string(), "select.options[1].color");
        assert_eq!(err.code(), "unknown_enum_value");
    }

    #[test]
    fn test_rollup_function_rejected() {
        let mut raw = well_formed(PropertyKind::Rollup);
        raw["rollup"]["function"] = json!("median_absolute");
        let err = parse_property_definition(&raw).unwrap_err();
        assert_eq!(err.path.to_string(), "rollup.function");
    }

    fn schema_fixture() -> Value {
        json!({
            "Name": {"id": "title", "name": "Name", "type": "title", "title": {}},
            "Price": {"id": "abc", "name": "Price", "type": "number", "format": "dollar"},
            "Status": {"id": "s", "name": "Status", "type": "status"}
        })
    }

    #[test]
    fn test_parse_schema() {
        let schema = parse_schema(&schema_fixture()).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.get_by_id("abc").map(|p| p.name.as_str()), Some("Price"));
        assert_eq!(schema.title_property().map(|p| p.id.as_str()), Some("title"));
        assert_eq!(serialize_schema(&schema), schema_fixture());
    }

    #[test]
    fn test_schema_errors_are_aggregated_with_key_paths() {
        let mut raw = schema_fixture();
        raw["Status"]["type"] = json!("state");
        raw["Price"]["format"] = json!("bitcoin");

        let errors = parse_schema_at(&raw, Path::from("properties"), &ParseOptions::default()).unwrap_err();
        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, ["properties.Price.format", "properties.Status.type"]);
        assert_eq!(
            errors.iter().nth(1).map(|e| &e.kind),
            Some(&ErrorKind::UnknownVariant {
                kind: "property",
                tag: "state".to_string()
            })
        );
    }

    #[test]
    fn test_schema_duplicate_ids() {
        let mut raw = schema_fixture();
        raw["Cost"] = json!({"id": "abc", "name": "Cost", "type": "number", "format": "euro"});
        let errors = parse_schema(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.first().map(|e| &e.kind),
            Some(&ErrorKind::DuplicateIdentifier { id: "abc".to_string() })
        );
    }

    #[test]
    fn test_schema_key_check() {
        let mut raw = schema_fixture();
        raw["Price"]["name"] = json!("Cost");
        assert!(parse_schema(&raw).is_ok());

        let errors = parse_schema_with_options(&raw, &ParseOptions::strict()).unwrap_err();
        assert_eq!(errors.first().unwrap().path.to_string(), "Price.name");
    }

    #[test]
    fn test_fingerprint_stable_under_member_order() {
        let a = parse_schema(&schema_fixture()).unwrap();
        let b: Value = serde_json::from_str(
            r#"{
                "Status": {"type": "status", "name": "Status", "id": "s"},
                "Price": {"format": "dollar", "type": "number", "name": "Price", "id": "abc"},
                "Name": {"title": {}, "type": "title", "name": "Name", "id": "title"}
            }"#,
        )
        .unwrap();
        let b = parse_schema(&b).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = schema_fixture();
        c["Price"]["format"] = json!("euro");
        assert_ne!(a.fingerprint(), parse_schema(&c).unwrap().fingerprint());
    }
}
