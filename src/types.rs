/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Reference to another entity by identity, serialized as `{"id": 42}`.
///
/// Many-to-one and owning one-to-one associations are carried in payloads
/// and records as references; the referenced row lives in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
}

impl EntityRef {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    /// Maps a nullable foreign-key column to a reference
    pub fn from_column(id: Option<i64>) -> Option<Self> {
        id.map(Self::new)
    }

    /// Maps a nullable reference back to its foreign-key column value
    pub fn to_column(reference: Option<EntityRef>) -> Option<i64> {
        reference.map(|r| r.id)
    }
}

/// Kind of change applied to a persisted entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

impl ChangeAction {
    pub fn verb(&self) -> &'static str {
        match self {
            ChangeAction::Created => "created",
            ChangeAction::Updated => "updated",
            ChangeAction::Deleted => "deleted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ref_serializes_as_nested_id() {
        let value = serde_json::to_value(EntityRef::new(7)).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 7 }));

        let parsed: EntityRef = serde_json::from_value(serde_json::json!({ "id": 3 })).unwrap();
        assert_eq!(parsed.id, 3);
    }

    #[test]
    fn column_mapping_round_trips_null() {
        assert_eq!(EntityRef::from_column(None), None);
        assert_eq!(EntityRef::to_column(Some(EntityRef::new(9))), Some(9));
    }
}
