use hera_types::{EntityId, OrganizationId, RelationshipId};
use serde::{Deserialize, Serialize};

/// A directed, typed edge between two entities.
///
/// The store enforces no generic uniqueness; whether a parent may carry more
/// than one active edge of a given type is a per-type business rule the
/// caller checks before inserting (see `RelationshipStore::active_exists`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub organization_id: OrganizationId,
    pub relationship_type: String,
    pub parent_entity_id: EntityId,
    pub child_entity_id: EntityId,
    /// Optional structured payload carried on the edge.
    pub relationship_data: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_at: i64,
}
