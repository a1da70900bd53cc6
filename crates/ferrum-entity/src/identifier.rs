//! Association record linking a realm to one of its clients or users.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `{id, name}` pair stored in a realm's association list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedIdentifier {
    /// Object identifier.
    pub id: Uuid,
    /// Object name; the lookup key of the object itself.
    pub name: String,
}

impl ExtendedIdentifier {
    /// Create a new association record.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
