//! Store for the root entity records (`core_entities`).

use crate::error::{StoreError, StoreResult, is_constraint_violation};
use hera_db::Database;
use hera_model::{Entity, EntityFilter, EntityPatch, EntitySort, FieldType};
use hera_types::{EntityId, OrganizationId, now_millis};
use rusqlite::{Connection, params, params_from_iter};

const ENTITY_COLUMNS: &str =
    "id, organization_id, entity_type, entity_name, entity_code, is_active, created_at, updated_at";

/// An initial attribute supplied at entity-creation time.
#[derive(Debug, Clone)]
pub struct NewAttribute {
    pub field_name: String,
    pub field_value: String,
    pub field_type: FieldType,
}

impl NewAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field_name: name.into(),
            field_value: value.into(),
            field_type,
        }
    }
}

/// Store for generic tenant-scoped business records.
#[derive(Clone)]
pub struct EntityStore {
    db: Database,
}

impl EntityStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates an active entity.
    ///
    /// Fails with `DuplicateCode` when an active entity with the same
    /// (organization, type, code) already exists, and with `Validation` when
    /// type, name, or code is empty.
    pub fn create(
        &self,
        org: OrganizationId,
        entity_type: &str,
        name: &str,
        code: &str,
    ) -> StoreResult<Entity> {
        let entity = build_entity(org, entity_type, name, code)?;
        let conn = self.db.lock();
        insert_entity(&conn, &entity)?;
        Ok(entity)
    }

    /// Creates an entity together with its initial attributes in one
    /// database transaction: a failed attribute insert rolls back the
    /// entity rather than leaving an orphan root record.
    pub fn create_with_attributes(
        &self,
        org: OrganizationId,
        entity_type: &str,
        name: &str,
        code: &str,
        attributes: &[NewAttribute],
    ) -> StoreResult<Entity> {
        let entity = build_entity(org, entity_type, name, code)?;
        for attr in attributes {
            if attr.field_name.trim().is_empty() {
                return Err(StoreError::Validation("attribute field name is empty".into()));
            }
        }

        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        insert_entity(&tx, &entity)?;
        let now = now_millis();
        for attr in attributes {
            tx.execute(
                "INSERT INTO core_dynamic_data (entity_id, field_name, field_value, field_type, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entity.id.to_string(),
                    attr.field_name,
                    attr.field_value,
                    attr.field_type.as_str(),
                    now,
                ],
            )?;
        }
        tx.commit()?;
        Ok(entity)
    }

    /// Fetches an active entity. `NotFound` when absent or soft-deleted.
    pub fn get(&self, org: OrganizationId, id: EntityId) -> StoreResult<Entity> {
        let conn = self.db.lock();
        fetch_entity(&conn, org, id, false)
    }

    /// Fetches an entity regardless of its active flag.
    pub fn get_any(&self, org: OrganizationId, id: EntityId) -> StoreResult<Entity> {
        let conn = self.db.lock();
        fetch_entity(&conn, org, id, true)
    }

    /// Lists entities of a type, filtered and sorted.
    ///
    /// Soft-deleted rows are excluded unless `filter.include_inactive`.
    pub fn list(
        &self,
        org: OrganizationId,
        entity_type: &str,
        filter: &EntityFilter,
        sort: EntitySort,
    ) -> StoreResult<Vec<Entity>> {
        let mut sql = format!(
            "SELECT {ENTITY_COLUMNS} FROM core_entities
             WHERE organization_id = ?1 AND entity_type = ?2"
        );
        let mut values: Vec<String> = vec![org.to_string(), entity_type.to_string()];

        if !filter.include_inactive {
            sql.push_str(" AND is_active = 1");
        }
        if let Some(name) = &filter.name_contains {
            values.push(name.clone());
            sql.push_str(&format!(" AND instr(entity_name, ?{}) > 0", values.len()));
        }
        if let Some(code) = &filter.code {
            values.push(code.clone());
            sql.push_str(&format!(" AND entity_code = ?{}", values.len()));
        }
        // Sort columns come from a fixed enum, never from caller strings.
        sql.push_str(&format!(
            " ORDER BY {} {}",
            sort.field.column(),
            if sort.descending { "DESC" } else { "ASC" }
        ));

        let conn = self.db.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), read_entity_row)?;

        let mut entities = Vec::new();
        for row in rows {
            entities.push(decode_entity(row?)?);
        }
        Ok(entities)
    }

    /// Applies a partial update. Code changes are re-validated for
    /// uniqueness among active entities.
    pub fn update(
        &self,
        org: OrganizationId,
        id: EntityId,
        patch: &EntityPatch,
    ) -> StoreResult<Entity> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        let current = fetch_entity(&tx, org, id, true)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let name = patch.entity_name.clone().unwrap_or(current.entity_name);
        let code = patch.entity_code.clone().unwrap_or(current.entity_code);
        let active = patch.is_active.unwrap_or(current.is_active);
        if name.trim().is_empty() {
            return Err(StoreError::Validation("entity name is empty".into()));
        }
        if code.trim().is_empty() {
            return Err(StoreError::Validation("entity code is empty".into()));
        }

        let now = now_millis();
        tx.execute(
            "UPDATE core_entities
             SET entity_name = ?1, entity_code = ?2, is_active = ?3, updated_at = ?4
             WHERE id = ?5 AND organization_id = ?6",
            params![name, code, active, now, id.to_string(), org.to_string()],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                StoreError::DuplicateCode(format!(
                    "{}/{code} already active in organization {org}",
                    current.entity_type
                ))
            } else {
                e.into()
            }
        })?;
        tx.commit()?;

        Ok(Entity {
            id,
            organization_id: org,
            entity_type: current.entity_type,
            entity_name: name,
            entity_code: code,
            is_active: active,
            created_at: current.created_at,
            updated_at: now,
        })
    }

    /// Soft-deletes an entity. Attributes, metadata, and relationships are
    /// left untouched; queries for them must filter on the parent's flag.
    pub fn deactivate(&self, org: OrganizationId, id: EntityId) -> StoreResult<()> {
        let conn = self.db.lock();
        let changed = conn.execute(
            "UPDATE core_entities SET is_active = 0, updated_at = ?1
             WHERE id = ?2 AND organization_id = ?3",
            params![now_millis(), id.to_string(), org.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("entity {id}")));
        }
        Ok(())
    }

    /// Soft-deletes an entity together with its relationships (either
    /// direction) and active metadata, in one transaction.
    pub fn deactivate_cascade(&self, org: OrganizationId, id: EntityId) -> StoreResult<()> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        let now = now_millis();

        let changed = tx.execute(
            "UPDATE core_entities SET is_active = 0, updated_at = ?1
             WHERE id = ?2 AND organization_id = ?3",
            params![now, id.to_string(), org.to_string()],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(format!("entity {id}")));
        }
        tx.execute(
            "UPDATE core_relationships SET is_active = 0
             WHERE organization_id = ?1 AND (parent_entity_id = ?2 OR child_entity_id = ?2)",
            params![org.to_string(), id.to_string()],
        )?;
        tx.execute(
            "UPDATE core_metadata SET is_active = 0, effective_to = ?1
             WHERE organization_id = ?2 AND entity_id = ?3 AND is_active = 1",
            params![now, org.to_string(), id.to_string()],
        )?;
        tx.commit()?;
        tracing::debug!(%org, %id, "deactivated entity with cascade");
        Ok(())
    }

    /// Number of active entities of a type.
    pub fn count(&self, org: OrganizationId, entity_type: &str) -> StoreResult<usize> {
        let conn = self.db.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM core_entities
             WHERE organization_id = ?1 AND entity_type = ?2 AND is_active = 1",
            params![org.to_string(), entity_type],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn build_entity(
    org: OrganizationId,
    entity_type: &str,
    name: &str,
    code: &str,
) -> StoreResult<Entity> {
    if entity_type.trim().is_empty() {
        return Err(StoreError::Validation("entity type is empty".into()));
    }
    if name.trim().is_empty() {
        return Err(StoreError::Validation("entity name is empty".into()));
    }
    if code.trim().is_empty() {
        return Err(StoreError::Validation("entity code is empty".into()));
    }
    let now = now_millis();
    Ok(Entity {
        id: EntityId::new(),
        organization_id: org,
        entity_type: entity_type.to_string(),
        entity_name: name.to_string(),
        entity_code: code.to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

fn insert_entity(conn: &Connection, entity: &Entity) -> StoreResult<()> {
    // Pre-check gives the clear error; the partial unique index is the
    // backstop against a racing writer.
    let exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM core_entities
            WHERE organization_id = ?1 AND entity_type = ?2 AND entity_code = ?3 AND is_active = 1)",
        params![
            entity.organization_id.to_string(),
            entity.entity_type,
            entity.entity_code,
        ],
        |row| row.get(0),
    )?;
    if exists {
        return Err(duplicate_code(entity));
    }

    conn.execute(
        "INSERT INTO core_entities
         (id, organization_id, entity_type, entity_name, entity_code, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entity.id.to_string(),
            entity.organization_id.to_string(),
            entity.entity_type,
            entity.entity_name,
            entity.entity_code,
            entity.is_active,
            entity.created_at,
            entity.updated_at,
        ],
    )
    .map_err(|e| {
        if is_constraint_violation(&e) {
            duplicate_code(entity)
        } else {
            e.into()
        }
    })?;
    Ok(())
}

fn duplicate_code(entity: &Entity) -> StoreError {
    StoreError::DuplicateCode(format!(
        "{}/{} already active in organization {}",
        entity.entity_type, entity.entity_code, entity.organization_id
    ))
}

fn fetch_entity(
    conn: &Connection,
    org: OrganizationId,
    id: EntityId,
    include_inactive: bool,
) -> StoreResult<Entity> {
    let sql = if include_inactive {
        format!(
            "SELECT {ENTITY_COLUMNS} FROM core_entities
             WHERE id = ?1 AND organization_id = ?2"
        )
    } else {
        format!(
            "SELECT {ENTITY_COLUMNS} FROM core_entities
             WHERE id = ?1 AND organization_id = ?2 AND is_active = 1"
        )
    };
    let row = conn
        .query_row(&sql, params![id.to_string(), org.to_string()], read_entity_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(format!("entity {id}")),
            other => other.into(),
        })?;
    decode_entity(row)
}

type EntityRow = (String, String, String, String, String, bool, i64, i64);

fn read_entity_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntityRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn decode_entity(row: EntityRow) -> StoreResult<Entity> {
    let (id, org, entity_type, entity_name, entity_code, is_active, created_at, updated_at) = row;
    Ok(Entity {
        id: EntityId::parse(&id).map_err(|e| StoreError::Corrupt(format!("entity id: {e}")))?,
        organization_id: OrganizationId::parse(&org)
            .map_err(|e| StoreError::Corrupt(format!("organization id: {e}")))?,
        entity_type,
        entity_name,
        entity_code,
        is_active,
        created_at,
        updated_at,
    })
}
