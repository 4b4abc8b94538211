//! Rich text: ordered runs of styled text, equations and mentions.

use crate::model::enums::{closed_enum, AnnotationColor, TemplateMentionDate};
use crate::model::value::{DateRange, ObjectRef, PartialUser};

closed_enum! {
    /// Discriminant of a rich-text span.
    pub enum RichTextKind as "RichTextKind" {
        Text => "text",
        Equation => "equation",
        Mention => "mention",
    }
}

closed_enum! {
    /// Discriminant of a mention.
    pub enum MentionKind as "MentionKind" {
        Database => "database",
        Date => "date",
        LinkPreview => "link_preview",
        Page => "page",
        TemplateMention => "template_mention",
        User => "user",
    }
}

closed_enum! {
    /// Discriminant of a template mention.
    pub enum TemplateMentionKind as "TemplateMentionKind" {
        Date => "template_mention_date",
        User => "template_mention_user",
    }
}

/// Style flags and color of a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: AnnotationColor,
}

impl Annotations {
    /// True when no style is applied.
    pub fn is_plain(&self) -> bool {
        *self == Annotations::default()
    }
}

/// Inline link attached to a text span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextContent {
    pub content: String,
    pub link: Option<Link>,
}

/// Inline LaTeX expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Equation {
    pub expression: String,
}

/// Template placeholder resolved when the template is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateMention {
    Date(TemplateMentionDate),
    /// The literal `"me"`: whoever applies the template.
    User,
}

impl TemplateMention {
    /// Wire literal: `today`, `now` or `me`.
    pub fn token(self) -> &'static str {
        match self {
            TemplateMention::Date(date) => date.as_str(),
            TemplateMention::User => "me",
        }
    }

    pub fn kind(self) -> TemplateMentionKind {
        match self {
            TemplateMention::Date(_) => TemplateMentionKind::Date,
            TemplateMention::User => TemplateMentionKind::User,
        }
    }
}

/// Inline reference to another object. Carries only the reference, never
/// a copy of the referenced object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mention {
    Database(ObjectRef),
    Date(DateRange),
    LinkPreview { url: String },
    Page(ObjectRef),
    Template(TemplateMention),
    User(PartialUser),
}

impl Mention {
    pub fn kind(&self) -> MentionKind {
        match self {
            Mention::Database(_) => MentionKind::Database,
            Mention::Date(_) => MentionKind::Date,
            Mention::LinkPreview { .. } => MentionKind::LinkPreview,
            Mention::Page(_) => MentionKind::Page,
            Mention::Template(_) => MentionKind::TemplateMention,
            Mention::User(_) => MentionKind::User,
        }
    }

    pub fn page(id: impl Into<String>) -> Self {
        Mention::Page(ObjectRef::new(id))
    }

    pub fn database(id: impl Into<String>) -> Self {
        Mention::Database(ObjectRef::new(id))
    }

    pub fn user(id: impl Into<String>) -> Self {
        Mention::User(PartialUser::new(id))
    }

    /// Default plain-text projection of this mention.
    ///
    /// The service renders page and user mentions with the current title
    /// or name; without that state the projection falls back to the id.
    pub fn projection(&self) -> String {
        match self {
            Mention::Database(r) | Mention::Page(r) => r.id.clone(),
            Mention::Date(range) => match &range.end {
                Some(end) => format!("{} → {}", range.start.as_str(), end.as_str()),
                None => range.start.as_str().to_string(),
            },
            Mention::LinkPreview { url } => url.clone(),
            Mention::Template(t) => format!("@{}", t.token()),
            Mention::User(u) => format!("@{}", u.id),
        }
    }
}

/// Payload of a span, selected by its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpanContent {
    Text(TextContent),
    Equation(Equation),
    Mention(Mention),
}

impl SpanContent {
    pub fn kind(&self) -> RichTextKind {
        match self {
            SpanContent::Text(_) => RichTextKind::Text,
            SpanContent::Equation(_) => RichTextKind::Equation,
            SpanContent::Mention(_) => RichTextKind::Mention,
        }
    }

    /// Plain-text projection: text verbatim, the equation source, or the
    /// mention projection.
    pub fn projection(&self) -> String {
        match self {
            SpanContent::Text(t) => t.content.clone(),
            SpanContent::Equation(e) => e.expression.clone(),
            SpanContent::Mention(m) => m.projection(),
        }
    }
}

/// One atomic run within a rich-text sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RichTextSpan {
    pub content: SpanContent,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextSpan {
    /// Builds a span whose `plain_text` is the content's projection.
    pub fn new(content: SpanContent) -> Self {
        let plain_text = content.projection();
        Self {
            content,
            annotations: Annotations::default(),
            plain_text,
            href: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(SpanContent::Text(TextContent {
            content: content.into(),
            link: None,
        }))
    }

    pub fn equation(expression: impl Into<String>) -> Self {
        Self::new(SpanContent::Equation(Equation {
            expression: expression.into(),
        }))
    }

    pub fn mention(mention: Mention) -> Self {
        Self::new(SpanContent::Mention(mention))
    }

    pub fn kind(&self) -> RichTextKind {
        self.content.kind()
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn as_mention(&self) -> Option<&Mention> {
        match &self.content {
            SpanContent::Mention(m) => Some(m),
            _ => None,
        }
    }
}

/// An ordered sequence of spans. Order is reading order; may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RichText(Vec<RichTextSpan>);

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self) -> &[RichTextSpan] {
        &self.0
    }

    pub fn push(&mut self, span: RichTextSpan) {
        self.0.push(span);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RichTextSpan> {
        self.0.iter()
    }

    /// Concatenated `plain_text` of every span.
    pub fn plain_text(&self) -> String {
        self.0.iter().map(|s| s.plain_text.as_str()).collect()
    }

    pub fn into_spans(self) -> Vec<RichTextSpan> {
        self.0
    }
}

impl From<Vec<RichTextSpan>> for RichText {
    fn from(spans: Vec<RichTextSpan>) -> Self {
        RichText(spans)
    }
}

impl FromIterator<RichTextSpan> for RichText {
    fn from_iter<I: IntoIterator<Item = RichTextSpan>>(iter: I) -> Self {
        RichText(iter.into_iter().collect())
    }
}

impl IntoIterator for RichText {
    type Item = RichTextSpan;
    type IntoIter = std::vec::IntoIter<RichTextSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RichText {
    type Item = &'a RichTextSpan;
    type IntoIter = std::slice::Iter<'a, RichTextSpan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::value::DateValue;

    #[test]
    fn test_projection_per_kind() {
        assert_eq!(RichTextSpan::text("Hello").plain_text, "Hello");
        assert_eq!(RichTextSpan::equation("e^{i\\pi}").plain_text, "e^{i\\pi}");
        assert_eq!(
            RichTextSpan::mention(Mention::Template(TemplateMention::User)).plain_text,
            "@me"
        );
        assert_eq!(
            RichTextSpan::mention(Mention::Template(TemplateMention::Date(TemplateMentionDate::Now)))
                .plain_text,
            "@now"
        );
        let range = DateRange {
            start: DateValue::parse("2021-05-17").unwrap(),
            end: Some(DateValue::parse("2021-05-20").unwrap()),
            time_zone: None,
        };
        assert_eq!(Mention::Date(range).projection(), "2021-05-17 → 2021-05-20");
    }

    #[test]
    fn test_rich_text_plain_text_keeps_order() {
        let text: RichText = vec![
            RichTextSpan::text("a + b = "),
            RichTextSpan::equation("c"),
            RichTextSpan::text("!"),
        ]
        .into();
        assert_eq!(text.plain_text(), "a + b = c!");
        assert_eq!(text.len(), 3);
        assert_eq!(text.spans()[1].kind(), RichTextKind::Equation);
    }

    #[test]
    fn test_mention_kinds() {
        assert_eq!(Mention::page("p").kind(), MentionKind::Page);
        assert_eq!(Mention::database("d").kind(), MentionKind::Database);
        assert_eq!(Mention::user("u").kind(), MentionKind::User);
        assert_eq!(
            Mention::Template(TemplateMention::User).kind(),
            MentionKind::TemplateMention
        );
        assert_eq!(TemplateMention::User.kind().as_str(), "template_mention_user");
    }

    #[test]
    fn test_empty_rich_text() {
        let text = RichText::new();
        assert!(text.is_empty());
        assert_eq!(text.plain_text(), "");
    }
}
