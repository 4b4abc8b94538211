//! Property definitions: the columns of a database schema.

use serde_json::{Map, Value};

use crate::error::PropertyLabel;
use crate::model::enums::{closed_enum, Color, NumberFormat, RollupFunction};

closed_enum! {
    /// Discriminant of a property definition.
    pub enum PropertyKind as "PropertyKind" {
        Title => "title",
        RichText => "rich_text",
        Number => "number",
        Select => "select",
        MultiSelect => "multi_select",
        Status => "status",
        Date => "date",
        People => "people",
        Files => "files",
        Checkbox => "checkbox",
        Url => "url",
        Email => "email",
        PhoneNumber => "phone_number",
        Formula => "formula",
        Relation => "relation",
        Rollup => "rollup",
        CreatedTime => "created_time",
        CreatedBy => "created_by",
        LastEditedTime => "last_edited_time",
        LastEditedBy => "last_edited_by",
    }
}

impl PropertyKind {
    /// Kinds whose upstream payload shape is not specified. Their
    /// payloads are carried verbatim without validation.
    pub fn is_unspecified(self) -> bool {
        matches!(self, PropertyKind::Status | PropertyKind::Relation)
    }

    /// Kinds whose value is maintained by the service rather than by users.
    pub fn is_computed(self) -> bool {
        matches!(
            self,
            PropertyKind::Formula
                | PropertyKind::Rollup
                | PropertyKind::CreatedTime
                | PropertyKind::CreatedBy
                | PropertyKind::LastEditedTime
                | PropertyKind::LastEditedBy
        )
    }
}

/// Contents of a marker payload such as `"title": {}`. Usually empty;
/// kept as-is so nothing the service adds is lost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpaquePayload(pub Map<String, Value>);

impl OpaquePayload {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Payload of a kind whose shape is not specified upstream.
///
/// Holds whatever JSON sat under the kind's key, or `None` if the key was
/// absent. Never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnspecifiedPayload(pub Option<Value>);

impl UnspecifiedPayload {
    pub fn raw(&self) -> Option<&Value> {
        self.0.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}

/// One option of a select or multi-select property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
    pub color: Color,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: Color) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectConfig {
    pub options: Vec<SelectOption>,
}

impl SelectConfig {
    pub fn option_by_name(&self, name: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// Formula source, treated as an opaque interchange string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaConfig {
    pub expression: String,
}

/// Aggregation over a property reached through a relation.
///
/// Both references are by name and id; resolving them against live
/// schemas is up to the caller (see [`crate::validate`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupConfig {
    pub rollup_property_name: String,
    pub relation_property_name: String,
    pub rollup_property_id: String,
    pub relation_property_id: String,
    pub function: RollupFunction,
}

/// Type-specific configuration of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyConfig {
    Title(OpaquePayload),
    RichText(OpaquePayload),
    Number { format: NumberFormat },
    Select(SelectConfig),
    MultiSelect(SelectConfig),
    Status(UnspecifiedPayload),
    Date(OpaquePayload),
    People(OpaquePayload),
    Files(OpaquePayload),
    Checkbox(OpaquePayload),
    Url(OpaquePayload),
    Email(OpaquePayload),
    PhoneNumber(OpaquePayload),
    Formula(FormulaConfig),
    Relation(UnspecifiedPayload),
    Rollup(RollupConfig),
    CreatedTime(OpaquePayload),
    CreatedBy(OpaquePayload),
    LastEditedTime(OpaquePayload),
    LastEditedBy(OpaquePayload),
}

impl PropertyConfig {
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyConfig::Title(_) => PropertyKind::Title,
            PropertyConfig::RichText(_) => PropertyKind::RichText,
            PropertyConfig::Number { .. } => PropertyKind::Number,
            PropertyConfig::Select(_) => PropertyKind::Select,
            PropertyConfig::MultiSelect(_) => PropertyKind::MultiSelect,
            PropertyConfig::Status(_) => PropertyKind::Status,
            PropertyConfig::Date(_) => PropertyKind::Date,
            PropertyConfig::People(_) => PropertyKind::People,
            PropertyConfig::Files(_) => PropertyKind::Files,
            PropertyConfig::Checkbox(_) => PropertyKind::Checkbox,
            PropertyConfig::Url(_) => PropertyKind::Url,
            PropertyConfig::Email(_) => PropertyKind::Email,
            PropertyConfig::PhoneNumber(_) => PropertyKind::PhoneNumber,
            PropertyConfig::Formula(_) => PropertyKind::Formula,
            PropertyConfig::Relation(_) => PropertyKind::Relation,
            PropertyConfig::Rollup(_) => PropertyKind::Rollup,
            PropertyConfig::CreatedTime(_) => PropertyKind::CreatedTime,
            PropertyConfig::CreatedBy(_) => PropertyKind::CreatedBy,
            PropertyConfig::LastEditedTime(_) => PropertyKind::LastEditedTime,
            PropertyConfig::LastEditedBy(_) => PropertyKind::LastEditedBy,
        }
    }

    /// The marker configuration for kinds that carry no settings.
    ///
    /// Returns `None` for kinds that need settings (number, select,
    /// multi-select, formula, rollup).
    pub fn marker(kind: PropertyKind) -> Option<PropertyConfig> {
        let empty = OpaquePayload::empty;
        Some(match kind {
            PropertyKind::Title => PropertyConfig::Title(empty()),
            PropertyKind::RichText => PropertyConfig::RichText(empty()),
            PropertyKind::Status => PropertyConfig::Status(UnspecifiedPayload::default()),
            PropertyKind::Date => PropertyConfig::Date(empty()),
            PropertyKind::People => PropertyConfig::People(empty()),
            PropertyKind::Files => PropertyConfig::Files(empty()),
            PropertyKind::Checkbox => PropertyConfig::Checkbox(empty()),
            PropertyKind::Url => PropertyConfig::Url(empty()),
            PropertyKind::Email => PropertyConfig::Email(empty()),
            PropertyKind::PhoneNumber => PropertyConfig::PhoneNumber(empty()),
            PropertyKind::Relation => PropertyConfig::Relation(UnspecifiedPayload::default()),
            PropertyKind::CreatedTime => PropertyConfig::CreatedTime(empty()),
            PropertyKind::CreatedBy => PropertyConfig::CreatedBy(empty()),
            PropertyKind::LastEditedTime => PropertyConfig::LastEditedTime(empty()),
            PropertyKind::LastEditedBy => PropertyConfig::LastEditedBy(empty()),
            PropertyKind::Number
            | PropertyKind::Select
            | PropertyKind::MultiSelect
            | PropertyKind::Formula
            | PropertyKind::Rollup => return None,
        })
    }
}

/// One column of a database schema.
///
/// Immutable value object: changing a property means replacing the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub id: String,
    pub name: String,
    pub config: PropertyConfig,
}

impl PropertyDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, config: PropertyConfig) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            config,
        }
    }

    pub fn kind(&self) -> PropertyKind {
        self.config.kind()
    }

    pub fn label(&self) -> PropertyLabel {
        PropertyLabel {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
        }
    }

    pub fn as_rollup(&self) -> Option<&RollupConfig> {
        match &self.config {
            PropertyConfig::Rollup(r) => Some(r),
            _ => None,
        }
    }

    /// Options of a select or multi-select property.
    pub fn select_options(&self) -> Option<&[SelectOption]> {
        match &self.config {
            PropertyConfig::Select(s) | PropertyConfig::MultiSelect(s) => Some(&s.options),
            _ => None,
        }
    }

    pub fn number_format(&self) -> Option<NumberFormat> {
        match self.config {
            PropertyConfig::Number { format } => Some(format),
            _ => None,
        }
    }
}
