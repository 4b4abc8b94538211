//! Database objects and their property schema.

use rustc_hash::FxHashMap;

use crate::model::file::{FileReference, Icon};
use crate::model::parent::ParentReference;
use crate::model::property::{PropertyDefinition, PropertyKind};
use crate::model::rich_text::RichText;
use crate::model::value::{PartialUser, Timestamp};

/// The property schema of a database.
///
/// Entries are keyed by the name the service uses as map key (normally
/// equal to the property's `name`) and kept in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    entries: Vec<(String, PropertyDefinition)>,
    by_id: FxHashMap<String, usize>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry under `key`.
    pub fn insert(&mut self, key: impl Into<String>, property: PropertyDefinition) {
        let key = key.into();
        match self.position(&key) {
            Ok(pos) => {
                self.by_id.remove(&self.entries[pos].1.id);
                self.by_id.insert(property.id.clone(), pos);
                self.entries[pos].1 = property;
            }
            Err(pos) => {
                self.entries.insert(pos, (key, property));
                self.reindex();
            }
        }
    }

    fn position(&self, key: &str) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.as_str().cmp(key))
    }

    fn reindex(&mut self) {
        self.by_id.clear();
        for (i, (_, property)) in self.entries.iter().enumerate() {
            self.by_id.insert(property.id.clone(), i);
        }
    }

    /// Looks up a property by its map key.
    pub fn get(&self, key: &str) -> Option<&PropertyDefinition> {
        self.position(key).ok().map(|i| &self.entries[i].1)
    }

    /// Looks up a property by its id.
    pub fn get_by_id(&self, id: &str) -> Option<&PropertyDefinition> {
        self.by_id.get(id).map(|&i| &self.entries[i].1)
    }

    /// Returns true if some property has id `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyDefinition)> {
        self.entries.iter().map(|(k, p)| (k.as_str(), p))
    }

    /// Properties in key order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.entries.iter().map(|(_, p)| p)
    }

    pub fn of_kind(&self, kind: PropertyKind) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties().filter(move |p| p.kind() == kind)
    }

    pub fn rollups(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.of_kind(PropertyKind::Rollup)
    }

    pub fn relations(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.of_kind(PropertyKind::Relation)
    }

    /// The title property. Every database has exactly one.
    pub fn title_property(&self) -> Option<&PropertyDefinition> {
        self.of_kind(PropertyKind::Title).next()
    }
}

impl FromIterator<PropertyDefinition> for Schema {
    /// Collects properties keyed by their names.
    fn from_iter<I: IntoIterator<Item = PropertyDefinition>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for property in iter {
            schema.insert(property.name.clone(), property);
        }
        schema
    }
}

/// A database: its metadata and property schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    pub id: String,
    pub created_time: Timestamp,
    pub created_by: PartialUser,
    pub last_edited_time: Timestamp,
    pub last_edited_by: PartialUser,
    pub title: RichText,
    pub description: RichText,
    pub icon: Option<Icon>,
    pub cover: Option<FileReference>,
    pub properties: Schema,
    pub parent: ParentReference,
    pub url: String,
    pub archived: bool,
    /// True if the database is an inline block rather than a child page.
    pub is_inline: bool,
}
