//! Object identifiers and content fingerprints.
//!
//! Pages, databases and blocks are identified by UUIDs, which the service
//! emits both hyphenated and as 32 bare hex digits. Property ids are short
//! opaque strings and are never normalised.

use std::fmt;

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Parses an object id, with or without hyphens.
pub fn parse_object_id(s: &str) -> Option<Uuid> {
    Uuid::try_parse(s).ok()
}

/// Formats an object id in the hyphenated lowercase form.
pub fn format_object_id(id: &Uuid) -> String {
    id.hyphenated().to_string()
}

/// Canonical form of an object id for use as a lookup key.
///
/// UUIDs are hyphenated and lowercased; anything else is kept verbatim.
pub fn normalize_object_id(s: &str) -> String {
    match parse_object_id(s) {
        Some(id) => format_object_id(&id),
        None => s.to_string(),
    }
}

/// Whether two strings name the same object.
pub fn same_object_id(a: &str, b: &str) -> bool {
    match (parse_object_id(a), parse_object_id(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

/// SHA-256 digest of a canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Fingerprint(Sha256::digest(bytes).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
