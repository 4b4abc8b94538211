//! Parent references: what contains a page or database.

use uuid::Uuid;

use crate::model::enums::closed_enum;
use crate::model::id::parse_object_id;

closed_enum! {
    /// Discriminant of a parent reference.
    pub enum ParentKind as "ParentKind" {
        Database => "database_id",
        Page => "page_id",
        Block => "block_id",
        Workspace => "workspace",
    }
}

/// The containing object of a page or database.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentReference {
    Database(String),
    Page(String),
    Block(String),
    /// Top level of the workspace. The wire form is `"workspace": true`.
    Workspace,
}

impl ParentReference {
    pub fn kind(&self) -> ParentKind {
        match self {
            ParentReference::Database(_) => ParentKind::Database,
            ParentReference::Page(_) => ParentKind::Page,
            ParentReference::Block(_) => ParentKind::Block,
            ParentReference::Workspace => ParentKind::Workspace,
        }
    }

    /// Identifier of the parent, `None` for the workspace.
    pub fn id(&self) -> Option<&str> {
        match self {
            ParentReference::Database(id) | ParentReference::Page(id) | ParentReference::Block(id) => {
                Some(id.as_str())
            }
            ParentReference::Workspace => None,
        }
    }

    /// The parent id as a UUID, if it is one.
    pub fn object_id(&self) -> Option<Uuid> {
        self.id().and_then(parse_object_id)
    }
}
