//! Parent reference encoding/decoding.
//!
//! `{"type": "page_id", "page_id": "..."}` or
//! `{"type": "workspace", "workspace": true}`.

use serde_json::Value;

use crate::codec::dispatch::dispatch;
use crate::codec::primitives::{Reader, Writer};
use crate::error::{ErrorKind, Path, ValidationError};
use crate::model::parent::{ParentKind, ParentReference};

pub fn parse_parent(raw: &Value) -> Result<ParentReference, ValidationError> {
    parse_parent_at(raw, Path::root())
}

pub(crate) fn parse_parent_at(raw: &Value, path: Path) -> Result<ParentReference, ValidationError> {
    let reader = Reader::new(raw, path)?;
    dispatch(&reader, "parent", |kind: ParentKind, r| match kind {
        ParentKind::Database => Ok(ParentReference::Database(r.read_string(kind.as_str())?)),
        ParentKind::Page => Ok(ParentReference::Page(r.read_string(kind.as_str())?)),
        ParentKind::Block => Ok(ParentReference::Block(r.read_string(kind.as_str())?)),
        ParentKind::Workspace => {
            let key = kind.as_str();
            match r.read_value(key)? {
                Value::Bool(true) => Ok(ParentReference::Workspace),
                other => Err(r.error(
                    key,
                    ErrorKind::InvalidLiteral {
                        field: key.to_string(),
                        expected: "true".to_string(),
                        actual: other.to_string(),
                    },
                )),
            }
        }
    })
}

pub fn serialize_parent(parent: &ParentReference) -> Value {
    let mut writer = Writer::new();
    let tag = parent.kind().as_str();
    match parent {
        ParentReference::Database(id) | ParentReference::Page(id) | ParentReference::Block(id) => {
            writer.write_tagged(tag, Value::String(id.clone()));
        }
        ParentReference::Workspace => {
            writer.write_tagged(tag, Value::Bool(true));
        }
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_every_parent_kind() {
        let cases = [
            (json!({"type": "database_id", "database_id": "d"}), ParentReference::Database("d".to_string())),
            (json!({"type": "page_id", "page_id": "p"}), ParentReference::Page("p".to_string())),
            (json!({"type": "block_id", "block_id": "b"}), ParentReference::Block("b".to_string())),
            (json!({"type": "workspace", "workspace": true}), ParentReference::Workspace),
        ];
        for (raw, expected) in cases {
            let parent = parse_parent(&raw).unwrap();
            assert_eq!(parent, expected);
            assert_eq!(serialize_parent(&parent), raw);
        }
    }

    #[test]
    fn test_workspace_requires_true() {
        for value in [json!(false), json!("true"), json!(1)] {
            let err = parse_parent(&json!({"type": "workspace", "workspace": value})).unwrap_err();
            assert_eq!(err.path.to_string(), "workspace");
            match err.kind {
                ErrorKind::InvalidLiteral { ref expected, .. } => assert_eq!(expected, "true"),
                ref other => panic!("expected invalid literal, got {other:?}"),
            }
        }

        let err = parse_parent(&json!({"type": "workspace"})).unwrap_err();
        assert_eq!(err.code(), "missing_field");
    }

    #[test]
    fn test_id_must_be_string() {
        let err = parse_parent_at(&json!({"type": "page_id", "page_id": 7}), Path::from("parent")).unwrap_err();
        assert_eq!(err.path.to_string(), "parent.page_id");
        assert_eq!(err.code(), "invalid_type");
    }

    #[test]
    fn test_unknown_parent() {
        let err = parse_parent(&json!({"type": "team_id", "team_id": "t"})).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnknownVariant {
                kind: "parent",
                tag: "team_id".to_string()
            }
        );
    }
}
