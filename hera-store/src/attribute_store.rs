//! Store for dynamic attributes (`core_dynamic_data`).
//!
//! Attributes are independent of entity existence by design: reading the
//! attributes of an unknown (or soft-deleted) entity yields an empty map,
//! not an error.

use crate::error::{StoreError, StoreResult};
use hera_db::Database;
use hera_model::{Attribute, AttributeMap, FieldType};
use hera_types::{EntityId, OrganizationId, now_millis};
use rusqlite::{params, params_from_iter};
use std::collections::HashMap;

/// Store for open-ended typed key/value extension data.
#[derive(Clone)]
pub struct AttributeStore {
    db: Database,
}

impl AttributeStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Upserts one attribute. Idempotent: repeating the call with identical
    /// arguments leaves exactly one row for (entity, field).
    pub fn set(
        &self,
        entity_id: EntityId,
        field_name: &str,
        value: &str,
        field_type: FieldType,
    ) -> StoreResult<()> {
        if field_name.trim().is_empty() {
            return Err(StoreError::Validation("attribute field name is empty".into()));
        }
        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO core_dynamic_data (entity_id, field_name, field_value, field_type, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(entity_id, field_name) DO UPDATE SET
                 field_value = excluded.field_value,
                 field_type = excluded.field_type,
                 updated_at = excluded.updated_at",
            params![entity_id.to_string(), field_name, value, field_type.as_str(), now_millis()],
        )?;
        Ok(())
    }

    /// Returns all current attributes of one entity.
    pub fn get(&self, entity_id: EntityId) -> StoreResult<AttributeMap> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare(
            "SELECT field_name, field_value, field_type, updated_at
             FROM core_dynamic_data WHERE entity_id = ?1",
        )?;
        let rows = stmt.query_map(params![entity_id.to_string()], read_attribute_row)?;

        let mut map = AttributeMap::new();
        for row in rows {
            map.insert(row?);
        }
        Ok(map)
    }

    /// Batched fetch: all attributes of many entities in one query, grouped
    /// by entity id in a single pass. Entities with no attributes map to an
    /// empty [`AttributeMap`].
    pub fn get_bulk(
        &self,
        entity_ids: &[EntityId],
    ) -> StoreResult<HashMap<EntityId, AttributeMap>> {
        let mut result: HashMap<EntityId, AttributeMap> = entity_ids
            .iter()
            .map(|id| (*id, AttributeMap::new()))
            .collect();
        if entity_ids.is_empty() {
            return Ok(result);
        }

        let placeholders = entity_ids
            .iter()
            .enumerate()
            .map(|(i, _)| format!("?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT entity_id, field_name, field_value, field_type, updated_at
             FROM core_dynamic_data WHERE entity_id IN ({placeholders})"
        );

        let conn = self.db.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params_from_iter(entity_ids.iter().map(ToString::to_string)),
            |row| {
                let entity_id: String = row.get(0)?;
                Ok((
                    entity_id,
                    Attribute {
                        field_name: row.get(1)?,
                        field_value: row.get(2)?,
                        field_type: FieldType::parse(&row.get::<_, String>(3)?),
                        updated_at: row.get(4)?,
                    },
                ))
            },
        )?;

        for row in rows {
            let (id_str, attr) = row?;
            let id = EntityId::parse(&id_str)
                .map_err(|e| StoreError::Corrupt(format!("entity id: {e}")))?;
            result.entry(id).or_default().insert(attr);
        }
        Ok(result)
    }

    /// Removes one attribute. Removing an absent field is a no-op.
    pub fn remove(&self, entity_id: EntityId, field_name: &str) -> StoreResult<()> {
        let conn = self.db.lock();
        conn.execute(
            "DELETE FROM core_dynamic_data WHERE entity_id = ?1 AND field_name = ?2",
            params![entity_id.to_string(), field_name],
        )?;
        Ok(())
    }

    /// Finds active entities of a type whose attribute matches a value
    /// exactly. One query joining dynamic data to the entity table; used by
    /// business-rule duplicate checks (e.g. customer email collisions).
    pub fn find_entities_with_value(
        &self,
        org: OrganizationId,
        entity_type: &str,
        field_name: &str,
        value: &str,
    ) -> StoreResult<Vec<EntityId>> {
        let conn = self.db.lock();
        let mut stmt = conn.prepare(
            "SELECT d.entity_id
             FROM core_dynamic_data d
             JOIN core_entities e ON e.id = d.entity_id
             WHERE e.organization_id = ?1 AND e.entity_type = ?2 AND e.is_active = 1
               AND d.field_name = ?3 AND d.field_value = ?4",
        )?;
        let rows = stmt.query_map(
            params![org.to_string(), entity_type, field_name, value],
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

fn read_attribute_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Attribute> {
    Ok(Attribute {
        field_name: row.get(0)?,
        field_value: row.get(1)?,
        field_type: FieldType::parse(&row.get::<_, String>(2)?),
        updated_at: row.get(3)?,
    })
}
