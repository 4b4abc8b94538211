//! Rich text encoding/decoding.
//!
//! Wire shape of one span:
//!
//! ```json
//! {
//!   "type": "text",
//!   "text": { "content": "Hello", "link": null },
//!   "annotations": { "bold": false, "italic": false, "strikethrough": false,
//!                    "underline": false, "code": false, "color": "default" },
//!   "plain_text": "Hello",
//!   "href": null
//! }
//! ```

use serde_json::{json, Value};

use crate::codec::dispatch::{dispatch, tagged_payload};
use crate::codec::options::{AnnotationPolicy, ParseOptions};
use crate::codec::primitives::{array_items, Reader, Writer};
use crate::error::{Path, ValidationError, ValidationErrors};
use crate::model::enums::{AnnotationColor, TemplateMentionDate};
use crate::model::rich_text::{
    Annotations, Equation, Link, Mention, MentionKind, RichText, RichTextKind, RichTextSpan,
    SpanContent, TemplateMention, TemplateMentionKind, TextContent,
};
use crate::model::value::{DateRange, ObjectRef, PartialUser};

const ANNOTATION_FLAGS: [&str; 5] = ["bold", "italic", "strikethrough", "underline", "code"];

// =============================================================================
// DECODING
// =============================================================================

/// Parses a rich-text array with default options.
///
/// Spans are parsed independently: every malformed span contributes one
/// error (the first violation inside it), in array order.
pub fn parse_rich_text(raw: &Value) -> Result<RichText, ValidationErrors> {
    parse_rich_text_with_options(raw, &ParseOptions::default())
}

pub fn parse_rich_text_with_options(raw: &Value, options: &ParseOptions) -> Result<RichText, ValidationErrors> {
    parse_rich_text_at(raw, Path::root(), options)
}

pub(crate) fn parse_rich_text_at(
    raw: &Value,
    path: Path,
    options: &ParseOptions,
) -> Result<RichText, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut spans = Vec::new();

    for (item, item_path) in array_items(raw, path)? {
        if let Some(span) = errors.collect(parse_span_at(item, item_path, options)) {
            spans.push(span);
        }
    }

    if errors.is_empty() {
        Ok(RichText::from(spans))
    } else {
        tracing::debug!(failed = errors.len(), total = spans.len() + errors.len(), "rich text rejected");
        Err(errors)
    }
}

/// Parses a single span with default options.
pub fn parse_rich_text_span(raw: &Value) -> Result<RichTextSpan, ValidationError> {
    parse_span_at(raw, Path::root(), &ParseOptions::default())
}

fn parse_span_at(raw: &Value, path: Path, options: &ParseOptions) -> Result<RichTextSpan, ValidationError> {
    let reader = Reader::new(raw, path)?;

    let content = dispatch(&reader, "richText", |kind: RichTextKind, r| {
        let payload = tagged_payload(r, kind)?;
        match kind {
            RichTextKind::Text => parse_text(&payload).map(SpanContent::Text),
            RichTextKind::Equation => Ok(SpanContent::Equation(Equation {
                expression: payload.read_string("expression")?,
            })),
            RichTextKind::Mention => parse_mention(&payload).map(SpanContent::Mention),
        }
    })?;

    let annotations = parse_annotations(&reader, options.annotations)?;
    let plain_text = reader.read_string("plain_text")?;
    let href = reader.read_opt_string("href")?;

    Ok(RichTextSpan {
        content,
        annotations,
        plain_text,
        href,
    })
}

fn parse_text(reader: &Reader<'_>) -> Result<TextContent, ValidationError> {
    let content = reader.read_string("content")?;
    let link = reader
        .read_opt_object("link")?
        .map(|link| link.read_string("url").map(|url| Link { url }))
        .transpose()?;
    Ok(TextContent { content, link })
}

fn parse_annotations(reader: &Reader<'_>, policy: AnnotationPolicy) -> Result<Annotations, ValidationError> {
    let annotations = match policy {
        AnnotationPolicy::Strict => reader.read_object("annotations")?,
        AnnotationPolicy::Permissive => match reader.read_opt_object("annotations")? {
            Some(annotations) => annotations,
            None => return Ok(Annotations::default()),
        },
    };

    let mut flags = [false; 5];
    for (flag, key) in flags.iter_mut().zip(ANNOTATION_FLAGS) {
        *flag = match policy {
            AnnotationPolicy::Strict => annotations.read_bool(key)?,
            AnnotationPolicy::Permissive if annotations.raw_non_null(key).is_none() => false,
            AnnotationPolicy::Permissive => annotations.read_bool(key)?,
        };
    }

    let color = match policy {
        AnnotationPolicy::Permissive if annotations.raw_non_null("color").is_none() => {
            AnnotationColor::default()
        }
        _ => {
            let s = annotations.read_str("color")?;
            s.parse::<AnnotationColor>().map_err(|kind| annotations.error("color", kind))?
        }
    };

    let [bold, italic, strikethrough, underline, code] = flags;
    Ok(Annotations {
        bold,
        italic,
        strikethrough,
        underline,
        code,
        color,
    })
}

/// Parses a mention object (the value under a span's `mention` key).
fn parse_mention(reader: &Reader<'_>) -> Result<Mention, ValidationError> {
    dispatch(reader, "mention", |kind: MentionKind, r| {
        let payload = tagged_payload(r, kind)?;
        match kind {
            MentionKind::Database => Ok(Mention::Database(ObjectRef {
                id: payload.read_string("id")?,
            })),
            MentionKind::Date => parse_date_range(&payload).map(Mention::Date),
            MentionKind::LinkPreview => Ok(Mention::LinkPreview {
                url: payload.read_string("url")?,
            }),
            MentionKind::Page => Ok(Mention::Page(ObjectRef {
                id: payload.read_string("id")?,
            })),
            MentionKind::TemplateMention => parse_template_mention(&payload).map(Mention::Template),
            MentionKind::User => parse_partial_user(&payload).map(Mention::User),
        }
    })
}

fn parse_template_mention(reader: &Reader<'_>) -> Result<TemplateMention, ValidationError> {
    dispatch(reader, "template_mention", |kind: TemplateMentionKind, r| match kind {
        TemplateMentionKind::Date => r
            .read_enum::<TemplateMentionDate>(kind.as_str())
            .map(TemplateMention::Date),
        TemplateMentionKind::User => {
            r.expect_literal(kind.as_str(), "me")?;
            Ok(TemplateMention::User)
        }
    })
}

fn parse_date_range(reader: &Reader<'_>) -> Result<DateRange, ValidationError> {
    Ok(DateRange {
        start: reader.read_date("start")?,
        end: reader.read_opt_date("end")?,
        time_zone: reader.read_opt_string("time_zone")?,
    })
}

/// Parses `{"object": "user", "id": ...}`.
pub(crate) fn parse_partial_user(reader: &Reader<'_>) -> Result<PartialUser, ValidationError> {
    reader.expect_literal("object", "user")?;
    Ok(PartialUser {
        id: reader.read_string("id")?,
    })
}

// =============================================================================
// ENCODING
// =============================================================================

/// Serializes rich text back to its wire array.
///
/// Absent optionals are omitted rather than written as `null`, so an
/// input carrying `"href": null` or `"link": null` serializes without
/// those members.
pub fn serialize_rich_text(text: &RichText) -> Value {
    Value::Array(text.iter().map(serialize_rich_text_span).collect())
}

/// Serializes one span; see [`serialize_rich_text`].
pub fn serialize_rich_text_span(span: &RichTextSpan) -> Value {
    let mut writer = Writer::new();
    let tag = span.kind();
    let payload = match &span.content {
        SpanContent::Text(text) => {
            let mut w = Writer::new();
            w.write_str("content", &text.content);
            if let Some(link) = &text.link {
                w.write_value("link", json!({ "url": link.url }));
            }
            w.finish()
        }
        SpanContent::Equation(equation) => json!({ "expression": equation.expression }),
        SpanContent::Mention(mention) => serialize_mention(mention),
    };
    writer
        .write_tagged(tag.as_str(), payload)
        .write_value("annotations", serialize_annotations(&span.annotations))
        .write_str("plain_text", &span.plain_text)
        .write_opt_str("href", span.href.as_deref());
    writer.finish()
}

fn serialize_annotations(annotations: &Annotations) -> Value {
    json!({
        "bold": annotations.bold,
        "italic": annotations.italic,
        "strikethrough": annotations.strikethrough,
        "underline": annotations.underline,
        "code": annotations.code,
        "color": annotations.color.as_str(),
    })
}

fn serialize_mention(mention: &Mention) -> Value {
    let payload = match mention {
        Mention::Database(r) | Mention::Page(r) => json!({ "id": r.id }),
        Mention::Date(range) => {
            let mut w = Writer::new();
            w.write_str("start", range.start.as_str())
                .write_opt_str("end", range.end.as_ref().map(|d| d.as_str()))
                .write_opt_str("time_zone", range.time_zone.as_deref());
            w.finish()
        }
        Mention::LinkPreview { url } => json!({ "url": url }),
        Mention::Template(template) => {
            let mut w = Writer::new();
            w.write_tagged(template.kind().as_str(), Value::String(template.token().to_string()));
            w.finish()
        }
        Mention::User(user) => serialize_partial_user(user),
    };
    let mut writer = Writer::new();
    writer.write_tagged(mention.kind().as_str(), payload);
    writer.finish()
}

pub(crate) fn serialize_partial_user(user: &PartialUser) -> Value {
    json!({ "object": "user", "id": user.id })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::model::enums::{BackgroundColor, Color};

    fn plain() -> Value {
        json!({
            "bold": false, "italic": false, "strikethrough": false,
            "underline": false, "code": false, "color": "default"
        })
    }

    fn text_span(content: &str) -> Value {
        json!({
            "type": "text",
            "text": {"content": content},
            "annotations": plain(),
            "plain_text": content
        })
    }

    fn mention_span(mention: Value, plain_text: &str) -> Value {
        json!({
            "type": "mention",
            "mention": mention,
            "annotations": plain(),
            "plain_text": plain_text
        })
    }

    #[test]
    fn test_text_span() {
        let raw = json!([{
            "type": "text",
            "text": {"content": "docs", "link": {"url": "https://developers.notion.com"}},
            "annotations": {
                "bold": true, "italic": false, "strikethrough": false,
                "underline": true, "code": false, "color": "blue_background"
            },
            "plain_text": "docs",
            "href": "https://developers.notion.com"
        }]);
        let text = parse_rich_text(&raw).unwrap();
        let span = &text.spans()[0];

        assert_eq!(span.kind(), RichTextKind::Text);
        assert!(span.annotations.bold && span.annotations.underline);
        assert_eq!(span.annotations.color, AnnotationColor::Background(BackgroundColor::Blue));
        assert_eq!(span.href.as_deref(), Some("https://developers.notion.com"));
        match &span.content {
            SpanContent::Text(t) => {
                assert_eq!(t.content, "docs");
                assert_eq!(t.link, Some(Link { url: "https://developers.notion.com".to_string() }));
            }
            other => panic!("expected text, got {other:?}"),
        }
        assert_eq!(serialize_rich_text(&text), raw);
    }

    #[test]
    fn test_every_span_and_mention_kind_parses() {
        let raw = json!([
            text_span("Hello "),
            {
                "type": "equation",
                "equation": {"expression": "E = mc^2"},
                "annotations": plain(),
                "plain_text": "E = mc^2"
            },
            mention_span(json!({"type": "database", "database": {"id": "a1d8501e-1ac1-43e9-a6bd-ea9fe6c8822b"}}), "Tasks"),
            mention_span(json!({"type": "date", "date": {"start": "2022-12-16", "end": null}}), "2022-12-16"),
            mention_span(json!({"type": "link_preview", "link_preview": {"url": "https://github.com"}}), "github"),
            mention_span(json!({"type": "page", "page": {"id": "3c612f56-fdd0-4a30-a4d6-bda7d7426309"}}), "Page"),
            mention_span(json!({
                "type": "template_mention",
                "template_mention": {"type": "template_mention_date", "template_mention_date": "today"}
            }), "@Today"),
            mention_span(json!({"type": "user", "user": {"object": "user", "id": "b2e19928-b427-4aad-9a9d-fde65479b1d9"}}), "@Anonymous"),
        ]);
        let text = parse_rich_text(&raw).unwrap();

        let kinds: Vec<&str> = text.iter().map(|s| s.kind().as_str()).collect();
        assert_eq!(kinds, ["text", "equation", "mention", "mention", "mention", "mention", "mention", "mention"]);

        let mentions: Vec<&str> = text
            .iter()
            .filter_map(|s| s.as_mention())
            .map(|m| m.kind().as_str())
            .collect();
        assert_eq!(mentions, ["database", "date", "link_preview", "page", "template_mention", "user"]);
    }

    #[test]
    fn test_mention_kinds_roundtrip() {
        let raw = json!([
            mention_span(json!({"type": "database", "database": {"id": "a1d8501e-1ac1-43e9-a6bd-ea9fe6c8822b"}}), "Tasks"),
            mention_span(json!({"type": "date", "date": {"start": "2022-12-16"}}), "2022-12-16"),
            mention_span(
                json!({"type": "date", "date": {
                    "start": "2022-12-16T09:00:00.000-05:00",
                    "end": "2022-12-18",
                    "time_zone": "America/New_York"
                }}),
                "Dec 16 to Dec 18",
            ),
            mention_span(json!({"type": "link_preview", "link_preview": {"url": "https://github.com"}}), "github"),
            mention_span(json!({"type": "user", "user": {"object": "user", "id": "b2e19928-b427-4aad-9a9d-fde65479b1d9"}}), "@Anonymous"),
        ]);
        let text = parse_rich_text(&raw).unwrap();
        match text.spans()[2].as_mention() {
            Some(Mention::Date(range)) => {
                assert!(range.start.has_time());
                assert_eq!(range.end.as_ref().map(|d| d.as_str()), Some("2022-12-18"));
                assert_eq!(range.time_zone.as_deref(), Some("America/New_York"));
            }
            other => panic!("expected date mention, got {other:?}"),
        }
        assert_eq!(serialize_rich_text(&text), raw);
    }

    #[test]
    fn test_null_optionals_are_omitted_on_serialize() {
        let mut span = text_span("docs");
        span["href"] = json!(null);
        span["text"]["link"] = json!(null);
        let text = parse_rich_text(&json!([span])).unwrap();
        assert_eq!(text.spans()[0].href, None);
        assert_eq!(serialize_rich_text(&text), json!([text_span("docs")]));
    }

    #[test]
    fn test_template_mention_me() {
        let raw = json!([{
            "type": "mention",
            "mention": {
                "type": "template_mention",
                "template_mention": {"type": "template_mention_user", "template_mention_user": "me"}
            },
            "annotations": plain(),
            "plain_text": "@me"
        }]);
        let text = parse_rich_text(&raw).unwrap();
        assert_eq!(text.len(), 1);
        match text.spans()[0].as_mention() {
            Some(Mention::Template(template)) => {
                assert_eq!(*template, TemplateMention::User);
                assert_eq!(template.token(), "me");
            }
            other => panic!("expected template mention, got {other:?}"),
        }
        assert_eq!(serialize_rich_text(&text), raw);
    }

    #[test]
    fn test_template_mention_rejects_other_literals() {
        let raw = json!([mention_span(json!({
            "type": "template_mention",
            "template_mention": {"type": "template_mention_user", "template_mention_user": "you"}
        }), "@you")]);
        let errors = parse_rich_text(&raw).unwrap_err();
        let err = errors.first().unwrap();
        assert_eq!(err.path.to_string(), "[0].mention.template_mention.template_mention_user");
        assert!(matches!(err.kind, ErrorKind::InvalidLiteral { .. }));

        let raw = json!([mention_span(json!({
            "type": "template_mention",
            "template_mention": {"type": "template_mention_date", "template_mention_date": "tomorrow"}
        }), "@tomorrow")]);
        let errors = parse_rich_text(&raw).unwrap_err();
        assert_eq!(
            errors.first().unwrap().kind,
            ErrorKind::UnknownEnumValue {
                enum_name: "TemplateMentionDate",
                value: "tomorrow".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_span_type() {
        let mut span = text_span("x");
        span["type"] = json!("emoji");
        let errors = parse_rich_text(&json!([text_span("ok"), span])).unwrap_err();
        let err = errors.first().unwrap();
        assert_eq!(err.path.to_string(), "[1].type");
        assert_eq!(
            err.kind,
            ErrorKind::UnknownVariant {
                kind: "richText",
                tag: "emoji".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_mention_type() {
        let raw = json!([mention_span(json!({"type": "custom_emoji", "custom_emoji": {}}), ":)")]);
        let errors = parse_rich_text(&raw).unwrap_err();
        let err = errors.first().unwrap();
        assert_eq!(err.path.to_string(), "[0].mention.type");
        assert_eq!(
            err.kind,
            ErrorKind::UnknownVariant {
                kind: "mention",
                tag: "custom_emoji".to_string()
            }
        );
    }

    #[test]
    fn test_errors_accumulate_per_span() {
        let mut no_plain = text_span("a");
        no_plain.as_object_mut().unwrap().remove("plain_text");
        let bad_content = json!({
            "type": "text", "text": {"content": 1}, "annotations": plain(), "plain_text": "1"
        });
        let raw = json!([no_plain, text_span("fine"), bad_content]);

        let errors = parse_rich_text(&raw).unwrap_err();
        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, ["[0].plain_text", "[2].text.content"]);
    }

    #[test]
    fn test_mention_user_requires_user_object() {
        let raw = json!([mention_span(json!({"type": "user", "user": {"object": "bot", "id": "x"}}), "@x")]);
        let errors = parse_rich_text(&raw).unwrap_err();
        assert_eq!(errors.first().unwrap().path.to_string(), "[0].mention.user.object");
    }

    #[test]
    fn test_mention_date_requires_valid_start() {
        let raw = json!([mention_span(json!({"type": "date", "date": {"start": "next week"}}), "x")]);
        let errors = parse_rich_text(&raw).unwrap_err();
        let err = errors.first().unwrap();
        assert_eq!(err.path.to_string(), "[0].mention.date.start");
        assert_eq!(err.code(), "invalid_timestamp");
    }

    #[test]
    fn test_strict_annotations_required() {
        let mut span = text_span("x");
        span["annotations"].as_object_mut().unwrap().remove("code");
        let errors = parse_rich_text(&json!([span.clone()])).unwrap_err();
        assert_eq!(errors.first().unwrap().path.to_string(), "[0].annotations.code");

        // Permissive mode defaults the missing flag
        let text = parse_rich_text_with_options(&json!([span]), &ParseOptions::permissive()).unwrap();
        assert!(!text.spans()[0].annotations.code);
    }

    #[test]
    fn test_permissive_annotations_absent() {
        let raw = json!([{"type": "equation", "equation": {"expression": "x"}, "plain_text": "x"}]);
        assert!(parse_rich_text(&raw).is_err());
        let text = parse_rich_text_with_options(&raw, &ParseOptions::permissive()).unwrap();
        assert!(text.spans()[0].annotations.is_plain());

        // Present but malformed values are still rejected
        let raw = json!([{
            "type": "equation", "equation": {"expression": "x"}, "plain_text": "x",
            "annotations": {"color": "magenta"}
        }]);
        let errors = parse_rich_text_with_options(&raw, &ParseOptions::permissive()).unwrap_err();
        assert_eq!(errors.first().unwrap().path.to_string(), "[0].annotations.color");
    }

    #[test]
    fn test_unknown_color() {
        let mut span = text_span("x");
        span["annotations"]["color"] = json!("magenta");
        let errors = parse_rich_text(&json!([span])).unwrap_err();
        assert_eq!(
            errors.first().unwrap().kind,
            ErrorKind::UnknownEnumValue {
                enum_name: "AnnotationColor",
                value: "magenta".to_string()
            }
        );
    }

    #[test]
    fn test_null_optionals_read_as_absent() {
        let raw = json!([{
            "type": "text",
            "text": {"content": "x", "link": null},
            "annotations": plain(),
            "plain_text": "x",
            "href": null
        }]);
        let text = parse_rich_text(&raw).unwrap();
        assert_eq!(serialize_rich_text(&text), json!([text_span("x")]));
    }

    #[test]
    fn test_empty_and_non_array() {
        assert!(parse_rich_text(&json!([])).unwrap().is_empty());
        let errors = parse_rich_text(&json!({"type": "text"})).unwrap_err();
        assert_eq!(errors.first().unwrap().code(), "invalid_type");
    }

    fn annotations_strategy() -> impl Strategy<Value = Value> {
        let colors: Vec<&'static str> = AnnotationColor::iter().map(|c| c.as_str()).collect();
        (any::<[bool; 5]>(), proptest::sample::select(colors)).prop_map(|(f, color)| {
            json!({
                "bold": f[0], "italic": f[1], "strikethrough": f[2],
                "underline": f[3], "code": f[4], "color": color
            })
        })
    }

    fn span_strategy() -> impl Strategy<Value = Value> {
        let text = ("[a-zA-Z0-9 ]{0,12}", proptest::option::of("https://[a-z]{1,8}\\.com"))
            .prop_map(|(content, url)| {
                let mut payload = json!({"content": content});
                if let Some(url) = url {
                    payload["link"] = json!({"url": url});
                }
                ("text", payload, content)
            });
        let equation = "[a-z+=^ ]{1,12}".prop_map(|e| ("equation", json!({"expression": e}), e));
        let page = "[0-9a-f]{32}".prop_map(|id| {
            ("mention", json!({"type": "page", "page": {"id": id}}), "Untitled".to_string())
        });
        let database = "[0-9a-f]{32}".prop_map(|id| {
            ("mention", json!({"type": "database", "database": {"id": id}}), "Tasks".to_string())
        });
        let date = (
            "20[0-9]{2}-0[1-9]-[12][0-8]",
            proptest::option::of("20[0-9]{2}-1[0-2]-0[1-9]T[01][0-9]:[0-5][0-9]:00\\.000Z"),
            proptest::option::of(proptest::sample::select(vec!["UTC", "Europe/Berlin", "America/New_York"])),
        )
            .prop_map(|(start, end, time_zone)| {
                let mut payload = json!({"start": start});
                if let Some(end) = end {
                    payload["end"] = json!(end);
                }
                if let Some(time_zone) = time_zone {
                    payload["time_zone"] = json!(time_zone);
                }
                ("mention", json!({"type": "date", "date": payload}), start)
            });
        let link_preview = "https://[a-z]{1,8}\\.com/[a-z0-9]{0,6}".prop_map(|url| {
            ("mention", json!({"type": "link_preview", "link_preview": {"url": url}}), url)
        });
        let user = "[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}".prop_map(|id| {
            (
                "mention",
                json!({"type": "user", "user": {"object": "user", "id": id}}),
                "@Anonymous".to_string(),
            )
        });
        let template = proptest::sample::select(vec![
            ("template_mention_date", "today"),
            ("template_mention_date", "now"),
            ("template_mention_user", "me"),
        ])
        .prop_map(|(tag, token)| {
            (
                "mention",
                json!({"type": "template_mention", "template_mention": {"type": tag, tag: token}}),
                format!("@{token}"),
            )
        });

        (
            prop_oneof![text, equation, page, database, date, link_preview, user, template],
            annotations_strategy(),
            proptest::option::of("https://[a-z]{1,8}\\.com"),
        )
            .prop_map(|((tag, payload, plain_text), annotations, href)| {
                let mut span = json!({
                    "type": tag,
                    tag: payload,
                    "annotations": annotations,
                    "plain_text": plain_text
                });
                if let Some(href) = href {
                    span["href"] = json!(href);
                }
                span
            })
    }

    proptest! {
        #[test]
        fn prop_well_formed_rich_text_roundtrips(spans in proptest::collection::vec(span_strategy(), 0..8)) {
            let raw = Value::Array(spans);
            let parsed = parse_rich_text(&raw).unwrap();
            prop_assert_eq!(serialize_rich_text(&parsed), raw);
        }
    }

    #[test]
    fn test_color_foreground() {
        let mut span = text_span("x");
        span["annotations"]["color"] = json!("red");
        let text = parse_rich_text(&json!([span])).unwrap();
        assert_eq!(text.spans()[0].annotations.color, AnnotationColor::Text(Color::Red));
    }
}
