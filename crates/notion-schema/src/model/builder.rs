//! Builder API for ergonomic construction of rich text and schemas.
//!
//! # Example
//!
//! ```rust
//! use notion_schema::model::builder::{RichTextBuilder, SchemaBuilder};
//! use notion_schema::{Color, Mention, NumberFormat, RollupFunction};
//!
//! let text = RichTextBuilder::new()
//!     .text("Ship it ")
//!     .text_with("today", |s| s.bold().color(Color::Red))
//!     .text(", see ")
//!     .mention(Mention::page("b55c9c91-384d-452b-81db-d1ef79372b75"))
//!     .build();
//! assert_eq!(text.len(), 4);
//!
//! let schema = SchemaBuilder::new()
//!     .title("title", "Name")
//!     .number("abc", "Price", NumberFormat::Dollar)
//!     .relation("rel", "Orders")
//!     .rollup("sum", "Revenue", |r| r
//!         .relation("rel", "Orders")
//!         .target("amt", "Amount")
//!         .function(RollupFunction::Sum))
//!     .build();
//! assert_eq!(schema.len(), 4);
//! ```

use crate::model::enums::{AnnotationColor, Color, NumberFormat, RollupFunction};
use crate::model::property::{
    FormulaConfig, PropertyConfig, PropertyDefinition, PropertyKind, RollupConfig, SelectConfig,
    SelectOption,
};
use crate::model::database::Schema;
use crate::model::rich_text::{
    Annotations, Link, Mention, RichText, RichTextSpan, SpanContent, TextContent,
};

/// Builder for a rich-text sequence. Every span gets a `plain_text`
/// projection computed from its content.
#[derive(Debug, Clone, Default)]
pub struct RichTextBuilder {
    spans: Vec<RichTextSpan>,
}

impl RichTextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unstyled text span.
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.spans.push(RichTextSpan::text(content));
        self
    }

    /// Adds a text span styled by `f`.
    pub fn text_with<F>(mut self, content: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(SpanBuilder) -> SpanBuilder,
    {
        let span = f(SpanBuilder::new(RichTextSpan::text(content))).finish();
        self.spans.push(span);
        self
    }

    pub fn equation(mut self, expression: impl Into<String>) -> Self {
        self.spans.push(RichTextSpan::equation(expression));
        self
    }

    pub fn mention(mut self, mention: Mention) -> Self {
        self.spans.push(RichTextSpan::mention(mention));
        self
    }

    /// Adds a mention span styled by `f`.
    pub fn mention_with<F>(mut self, mention: Mention, f: F) -> Self
    where
        F: FnOnce(SpanBuilder) -> SpanBuilder,
    {
        let span = f(SpanBuilder::new(RichTextSpan::mention(mention))).finish();
        self.spans.push(span);
        self
    }

    /// Adds a prebuilt span as-is.
    pub fn span(mut self, span: RichTextSpan) -> Self {
        self.spans.push(span);
        self
    }

    pub fn build(self) -> RichText {
        RichText::from(self.spans)
    }
}

/// Styles a single span.
#[derive(Debug, Clone)]
pub struct SpanBuilder {
    span: RichTextSpan,
}

impl SpanBuilder {
    fn new(span: RichTextSpan) -> Self {
        Self { span }
    }

    pub fn bold(mut self) -> Self {
        self.span.annotations.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.span.annotations.italic = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.span.annotations.strikethrough = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.span.annotations.underline = true;
        self
    }

    pub fn code(mut self) -> Self {
        self.span.annotations.code = true;
        self
    }

    pub fn color(mut self, color: impl Into<AnnotationColor>) -> Self {
        self.span.annotations.color = color.into();
        self
    }

    pub fn annotations(mut self, annotations: Annotations) -> Self {
        self.span.annotations = annotations;
        self
    }

    /// Links a text span to `url` and sets `href` to match.
    ///
    /// Mention spans only get the `href`.
    pub fn link(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if let SpanContent::Text(TextContent { link, .. }) = &mut self.span.content {
            *link = Some(Link { url: url.clone() });
        }
        self.span.href = Some(url);
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.span.href = Some(href.into());
        self
    }

    /// Overrides the computed plain-text projection.
    pub fn plain_text(mut self, plain_text: impl Into<String>) -> Self {
        self.span.plain_text = plain_text.into();
        self
    }

    fn finish(self) -> RichTextSpan {
        self.span
    }
}

/// Builder for a [`Schema`]. Entries are keyed by property name.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    properties: Vec<PropertyDefinition>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, property: PropertyDefinition) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds a property of a kind that carries no settings.
    ///
    /// Kinds that need settings are ignored; use their dedicated methods.
    pub fn marker(self, kind: PropertyKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        match PropertyConfig::marker(kind) {
            Some(config) => self.property(PropertyDefinition::new(id, name, config)),
            None => self,
        }
    }

    pub fn title(self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.marker(PropertyKind::Title, id, name)
    }

    pub fn relation(self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.marker(PropertyKind::Relation, id, name)
    }

    pub fn number(self, id: impl Into<String>, name: impl Into<String>, format: NumberFormat) -> Self {
        self.property(PropertyDefinition::new(id, name, PropertyConfig::Number { format }))
    }

    pub fn select(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        options: impl IntoIterator<Item = (&'static str, &'static str, Color)>,
    ) -> Self {
        let config = PropertyConfig::Select(select_config(options));
        self.property(PropertyDefinition::new(id, name, config))
    }

    pub fn multi_select(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        options: impl IntoIterator<Item = (&'static str, &'static str, Color)>,
    ) -> Self {
        let config = PropertyConfig::MultiSelect(select_config(options));
        self.property(PropertyDefinition::new(id, name, config))
    }

    pub fn formula(self, id: impl Into<String>, name: impl Into<String>, expression: impl Into<String>) -> Self {
        let config = PropertyConfig::Formula(FormulaConfig {
            expression: expression.into(),
        });
        self.property(PropertyDefinition::new(id, name, config))
    }

    /// Adds a rollup configured by `f`.
    pub fn rollup<F>(self, id: impl Into<String>, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(RollupBuilder) -> RollupBuilder,
    {
        let config = f(RollupBuilder::default()).build();
        self.property(PropertyDefinition::new(id, name, PropertyConfig::Rollup(config)))
    }

    pub fn build(self) -> Schema {
        self.properties.into_iter().collect()
    }
}

fn select_config(options: impl IntoIterator<Item = (&'static str, &'static str, Color)>) -> SelectConfig {
    SelectConfig {
        options: options
            .into_iter()
            .map(|(id, name, color)| SelectOption::new(id, name, color))
            .collect(),
    }
}

/// Builder for a rollup configuration. The function defaults to
/// `show_original`.
#[derive(Debug, Clone)]
pub struct RollupBuilder {
    config: RollupConfig,
}

impl Default for RollupBuilder {
    fn default() -> Self {
        Self {
            config: RollupConfig {
                rollup_property_name: String::new(),
                relation_property_name: String::new(),
                rollup_property_id: String::new(),
                relation_property_id: String::new(),
                function: RollupFunction::ShowOriginal,
            },
        }
    }
}

impl RollupBuilder {
    /// The relation property in the same schema.
    pub fn relation(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.config.relation_property_id = id.into();
        self.config.relation_property_name = name.into();
        self
    }

    /// The property aggregated in the related database.
    pub fn target(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.config.rollup_property_id = id.into();
        self.config.rollup_property_name = name.into();
        self
    }

    pub fn function(mut self, function: RollupFunction) -> Self {
        self.config.function = function;
        self
    }

    fn build(self) -> RollupConfig {
        self.config
    }
}
