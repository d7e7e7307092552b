use hera_types::{EntityId, MetadataId, OrganizationId};
use serde::{Deserialize, Serialize};

/// A structured, versioned payload attached to an entity.
///
/// Richer than a flat attribute: the value is arbitrary JSON, keyed by
/// (type, category, key), and versioned append-only. Superseding a document
/// deactivates the old row (`effective_to` set) and inserts a new one; at
/// most one row per key tuple is active at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub id: MetadataId,
    pub organization_id: OrganizationId,
    pub entity_type: String,
    pub entity_id: EntityId,
    pub metadata_type: String,
    pub metadata_category: String,
    pub metadata_key: String,
    pub metadata_value: serde_json::Value,
    pub is_active: bool,
    pub effective_from: i64,
    /// Set when the document is superseded or deactivated.
    pub effective_to: Option<i64>,
}
