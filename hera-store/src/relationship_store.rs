//! Store for typed directed edges between entities (`core_relationships`).
//!
//! The store enforces no generic uniqueness — whether a parent may carry
//! more than one active edge of a type is business-defined. Callers that
//! need "at most one" semantics check [`RelationshipStore::active_exists`]
//! before inserting.

use crate::error::{StoreError, StoreResult};
use hera_db::Database;
use hera_model::Relationship;
use hera_types::{EntityId, OrganizationId, RelationshipId, now_millis};
use rusqlite::params;

/// Store for directed, typed entity-to-entity edges.
#[derive(Clone)]
pub struct RelationshipStore {
    db: Database,
}

impl RelationshipStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts an active edge, optionally carrying a structured payload.
    pub fn create(
        &self,
        org: OrganizationId,
        relationship_type: &str,
        parent: EntityId,
        child: EntityId,
        payload: Option<&serde_json::Value>,
    ) -> StoreResult<Relationship> {
        if relationship_type.trim().is_empty() {
            return Err(StoreError::Validation("relationship type is empty".into()));
        }

        let rel = Relationship {
            id: RelationshipId::new(),
            organization_id: org,
            relationship_type: relationship_type.to_string(),
            parent_entity_id: parent,
            child_entity_id: child,
            relationship_data: payload.cloned(),
            is_active: true,
            created_at: now_millis(),
        };
        let serialized = payload.map(serde_json::to_string).transpose()?;

        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO core_relationships
             (id, organization_id, relationship_type, parent_entity_id, child_entity_id,
              relationship_data, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
            params![
                rel.id.to_string(),
                org.to_string(),
                relationship_type,
                parent.to_string(),
                child.to_string(),
                serialized,
                rel.created_at,
            ],
        )?;
        Ok(rel)
    }

    /// Child entity ids reachable from a parent over active edges of a type.
    pub fn children(
        &self,
        org: OrganizationId,
        parent: EntityId,
        relationship_type: &str,
    ) -> StoreResult<Vec<EntityId>> {
        self.linked_ids(
            "SELECT child_entity_id FROM core_relationships
             WHERE organization_id = ?1 AND parent_entity_id = ?2
               AND relationship_type = ?3 AND is_active = 1
             ORDER BY created_at ASC",
            org,
            parent,
            relationship_type,
        )
    }

    /// Parent entity ids pointing at a child over active edges of a type.
    pub fn parents(
        &self,
        org: OrganizationId,
        child: EntityId,
        relationship_type: &str,
    ) -> StoreResult<Vec<EntityId>> {
        self.linked_ids(
            "SELECT parent_entity_id FROM core_relationships
             WHERE organization_id = ?1 AND child_entity_id = ?2
               AND relationship_type = ?3 AND is_active = 1
             ORDER BY created_at ASC",
            org,
            child,
            relationship_type,
        )
    }

    /// True when the parent already carries an active edge of this type.
    /// The helper behind caller-side per-type uniqueness.
    pub fn active_exists(
        &self,
        org: OrganizationId,
        relationship_type: &str,
        parent: EntityId,
    ) -> StoreResult<bool> {
        let conn = self.db.lock();
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM core_relationships
                WHERE organization_id = ?1 AND parent_entity_id = ?2
                  AND relationship_type = ?3 AND is_active = 1)",
            params![org.to_string(), parent.to_string(), relationship_type],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Soft-deletes an edge.
    pub fn deactivate(&self, org: OrganizationId, id: RelationshipId) -> StoreResult<()> {
        let conn = self.db.lock();
        let changed = conn.execute(
            "UPDATE core_relationships SET is_active = 0
             WHERE id = ?1 AND organization_id = ?2",
            params![id.to_string(), org.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("relationship {id}")));
        }
        Ok(())
    }

    fn linked_ids(
        &self,
        sql: &str,
        org: OrganizationId,
        anchor: EntityId,
        relationship_type: &str,
    ) -> StoreResult<Vec<EntityId>> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(
            params![org.to_string(), anchor.to_string(), relationship_type],
            |row| row.get::<_, String>(0),
        )?;

        let mut ids = Vec::new();
        for row in rows {
            let id_str = row?;
            ids.push(
                EntityId::parse(&id_str)
                    .map_err(|e| StoreError::Corrupt(format!("entity id: {e}")))?,
            );
        }
        Ok(ids)
    }
}
