//! File reference and icon encoding/decoding.

use serde_json::{json, Value};

use crate::codec::dispatch::{dispatch, tagged_payload};
use crate::codec::primitives::{Reader, Writer};
use crate::error::{Path, ValidationError};
use crate::model::file::{ExternalFile, FileKind, FileReference, HostedFile, Icon, IconKind};

// =============================================================================
// DECODING
// =============================================================================

/// Parses a file reference.
///
/// Hosted URLs are read as-is; expiry is checked separately by
/// [`validate_file_expiry`](crate::validate::validate_file_expiry).
pub fn parse_file(raw: &Value) -> Result<FileReference, ValidationError> {
    parse_file_at(raw, Path::root())
}

pub(crate) fn parse_file_at(raw: &Value, path: Path) -> Result<FileReference, ValidationError> {
    let reader = Reader::new(raw, path)?;
    dispatch(&reader, "file", |kind: FileKind, r| match kind {
        FileKind::File => parse_hosted(&tagged_payload(r, kind)?).map(FileReference::Hosted),
        FileKind::External => parse_external(&tagged_payload(r, kind)?).map(FileReference::External),
    })
}

fn parse_hosted(reader: &Reader<'_>) -> Result<HostedFile, ValidationError> {
    Ok(HostedFile {
        url: reader.read_string("url")?,
        expiry_time: reader.read_timestamp("expiry_time")?,
    })
}

fn parse_external(reader: &Reader<'_>) -> Result<ExternalFile, ValidationError> {
    Ok(ExternalFile {
        url: reader.read_string("url")?,
    })
}

/// Parses a page or database icon: an emoji or a file reference.
pub fn parse_icon(raw: &Value) -> Result<Icon, ValidationError> {
    parse_icon_at(raw, Path::root())
}

pub(crate) fn parse_icon_at(raw: &Value, path: Path) -> Result<Icon, ValidationError> {
    let reader = Reader::new(raw, path)?;
    dispatch(&reader, "icon", |kind: IconKind, r| match kind {
        IconKind::Emoji => Ok(Icon::Emoji(r.read_string(kind.as_str())?)),
        IconKind::File => parse_hosted(&tagged_payload(r, kind)?).map(|f| Icon::File(FileReference::Hosted(f))),
        IconKind::External => {
            parse_external(&tagged_payload(r, kind)?).map(|f| Icon::File(FileReference::External(f)))
        }
    })
}

// =============================================================================
// ENCODING
// =============================================================================

pub fn serialize_file(file: &FileReference) -> Value {
    let payload = match file {
        FileReference::Hosted(f) => json!({ "url": f.url, "expiry_time": f.expiry_time.as_str() }),
        FileReference::External(f) => json!({ "url": f.url }),
    };
    let mut writer = Writer::new();
    writer.write_tagged(file.kind().as_str(), payload);
    writer.finish()
}

pub fn serialize_icon(icon: &Icon) -> Value {
    match icon {
        Icon::Emoji(emoji) => {
            let mut writer = Writer::new();
            writer.write_tagged(IconKind::Emoji.as_str(), Value::String(emoji.clone()));
            writer.finish()
        }
        Icon::File(file) => serialize_file(file),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_hosted_file() {
        let raw = json!({
            "type": "file",
            "file": {"url": "https://s3.us-west-2.amazonaws.com/a.png", "expiry_time": "2022-12-16T10:26:50.130Z"}
        });
        let file = parse_file(&raw).unwrap();
        assert_eq!(file.kind(), FileKind::File);
        assert!(!file.is_durable());
        let now = Utc.with_ymd_and_hms(2022, 12, 16, 10, 0, 0).unwrap();
        match &file {
            FileReference::Hosted(hosted) => assert!(!hosted.is_expired_at(now)),
            other => panic!("expected hosted, got {other:?}"),
        }
        assert_eq!(serialize_file(&file), raw);
    }

    #[test]
    fn test_external_file() {
        let raw = json!({"type": "external", "external": {"url": "https://website.domain/images/image.png"}});
        let file = parse_file(&raw).unwrap();
        assert_eq!(file, FileReference::external("https://website.domain/images/image.png"));
        assert_eq!(serialize_file(&file), raw);
    }

    #[test]
    fn test_hosted_file_bad_expiry() {
        let raw = json!({"type": "file", "file": {"url": "https://x", "expiry_time": "soon"}});
        let err = parse_file_at(&raw, Path::from("cover")).unwrap_err();
        assert_eq!(err.path.to_string(), "cover.file.expiry_time");
        assert_eq!(
            err.kind,
            ErrorKind::InvalidTimestamp {
                field: "expiry_time".to_string(),
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_file_kind() {
        let err = parse_file(&json!({"type": "emoji", "emoji": "x"})).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnknownVariant {
                kind: "file",
                tag: "emoji".to_string()
            }
        );
    }

    #[test]
    fn test_icons() {
        let emoji = json!({"type": "emoji", "emoji": "🎉"});
        let icon = parse_icon(&emoji).unwrap();
        assert_eq!(icon, Icon::Emoji("🎉".to_string()));
        assert_eq!(serialize_icon(&icon), emoji);

        let external = json!({"type": "external", "external": {"url": "https://example.com/i.svg"}});
        let icon = parse_icon(&external).unwrap();
        assert_eq!(icon.kind(), IconKind::External);
        assert_eq!(serialize_icon(&icon), external);

        let err = parse_icon(&json!({"type": "emoji", "emoji": null})).unwrap_err();
        assert_eq!(err.code(), "invalid_type");
    }
}
