//! Cross-reference validation for parsed schemas.
//!
//! Parsing checks each object on its own. Rollups also point at other
//! properties: a relation in the same schema and a property of the
//! database that relation targets. Those references are checked here,
//! against whatever schemas the caller has registered in a
//! [`SchemaContext`].
//!
//! **Note:** Checks are advisory. References into databases that were
//! never registered are allowed, since the codec cannot know every schema.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

use crate::error::ReferenceError;
use crate::model::database::{Database, Schema};
use crate::model::file::FileReference;
use crate::model::id::normalize_object_id;
use crate::model::property::{PropertyDefinition, PropertyKind, RollupConfig};

/// Known database schemas and relation targets.
///
/// Relation payloads are carried opaquely, so the database a relation
/// property points at is registered explicitly with
/// [`set_relation_target`](Self::set_relation_target).
#[derive(Debug, Clone, Default)]
pub struct SchemaContext {
    /// Schemas by normalised database id.
    schemas: FxHashMap<String, Schema>,
    /// (database id, relation property id) to target database id.
    relation_targets: FxHashMap<(String, String), String>,
}

impl SchemaContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the schema of a database, replacing any earlier one.
    pub fn add_schema(&mut self, database_id: &str, schema: Schema) {
        self.schemas.insert(normalize_object_id(database_id), schema);
    }

    pub fn add_database(&mut self, database: &Database) {
        self.add_schema(&database.id, database.properties.clone());
    }

    /// Records that relation property `relation_property_id` of
    /// `database_id` points at `target_database_id`.
    pub fn set_relation_target(&mut self, database_id: &str, relation_property_id: &str, target_database_id: &str) {
        self.relation_targets.insert(
            (normalize_object_id(database_id), relation_property_id.to_string()),
            normalize_object_id(target_database_id),
        );
    }

    pub fn schema(&self, database_id: &str) -> Option<&Schema> {
        self.schemas.get(&normalize_object_id(database_id))
    }

    pub fn relation_target(&self, database_id: &str, relation_property_id: &str) -> Option<&str> {
        self.relation_targets
            .get(&(normalize_object_id(database_id), relation_property_id.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Validates the rollups of `schema`.
///
/// Each rollup's relation property must exist in the same schema, carry
/// the name the rollup records, and be a relation. When `database_id` is
/// given and the relation's target schema is registered, the rolled-up
/// property must exist there under the recorded name.
///
/// All failures are returned, in schema order.
pub fn validate_rollups(
    schema: &Schema,
    database_id: Option<&str>,
    context: &SchemaContext,
) -> Result<(), Vec<ReferenceError>> {
    let mut errors = Vec::new();

    for property in schema.rollups() {
        let Some(rollup) = property.as_rollup() else {
            continue;
        };
        match check_relation(property, rollup, schema) {
            Err(e) => errors.push(e),
            Ok(relation) => {
                let target = database_id
                    .and_then(|db| context.relation_target(db, &relation.id))
                    .and_then(|target| context.schema(target).map(|s| (target, s)));
                if let Some((target_id, target_schema)) = target {
                    if let Err(e) = check_target(property, rollup, target_id, target_schema) {
                        errors.push(e);
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(failed = errors.len(), database_id, "rollup references rejected");
        Err(errors)
    }
}

fn check_relation<'s>(
    property: &PropertyDefinition,
    rollup: &RollupConfig,
    schema: &'s Schema,
) -> Result<&'s PropertyDefinition, ReferenceError> {
    let relation = schema
        .get_by_id(&rollup.relation_property_id)
        .ok_or_else(|| ReferenceError::RelationNotFound {
            rollup: property.name.clone(),
            relation_id: rollup.relation_property_id.clone(),
        })?;

    if relation.name != rollup.relation_property_name {
        return Err(ReferenceError::RelationNameMismatch {
            rollup: property.name.clone(),
            relation_id: relation.id.clone(),
            expected: rollup.relation_property_name.clone(),
            actual: relation.name.clone(),
        });
    }
    if relation.kind() != PropertyKind::Relation {
        return Err(ReferenceError::NotARelation {
            rollup: property.name.clone(),
            relation_id: relation.id.clone(),
            kind: relation.kind(),
        });
    }
    Ok(relation)
}

fn check_target(
    property: &PropertyDefinition,
    rollup: &RollupConfig,
    target_id: &str,
    target: &Schema,
) -> Result<(), ReferenceError> {
    let rolled_up = target
        .get_by_id(&rollup.rollup_property_id)
        .ok_or_else(|| ReferenceError::RollupTargetNotFound {
            rollup: property.name.clone(),
            property_id: rollup.rollup_property_id.clone(),
            database_id: target_id.to_string(),
        })?;

    if rolled_up.name != rollup.rollup_property_name {
        return Err(ReferenceError::RollupNameMismatch {
            rollup: property.name.clone(),
            property_id: rolled_up.id.clone(),
            expected: rollup.rollup_property_name.clone(),
            actual: rolled_up.name.clone(),
        });
    }
    Ok(())
}

/// Validates the rollups of a parsed database.
pub fn validate_database(database: &Database, context: &SchemaContext) -> Result<(), Vec<ReferenceError>> {
    validate_rollups(&database.properties, Some(&database.id), context)
}

/// Checks that a hosted file URL is still usable at `now`.
///
/// External files never expire.
pub fn validate_file_expiry(file: &FileReference, now: DateTime<Utc>) -> Result<(), ReferenceError> {
    match file {
        FileReference::Hosted(hosted) if hosted.is_expired_at(now) => Err(ReferenceError::FileExpired {
            expired_at: hosted.expiry_time.to_utc(),
        }),
        _ => Ok(()),
    }
}
