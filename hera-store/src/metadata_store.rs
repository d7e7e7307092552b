//! Store for versioned metadata documents (`core_metadata`).
//!
//! "Updating" a document is always supersede-then-insert: the old active row
//! gets `is_active = 0` and an `effective_to`, and a fresh row is inserted,
//! both inside one transaction. The partial unique index on the active key
//! tuple means two racing writers can never both end up with an active row.

use crate::error::{StoreError, StoreResult};
use hera_db::Database;
use hera_model::MetadataDocument;
use hera_types::{EntityId, MetadataId, OrganizationId, now_millis};
use rusqlite::{params, params_from_iter};

const METADATA_COLUMNS: &str = "id, organization_id, entity_type, entity_id, metadata_type, \
     metadata_category, metadata_key, metadata_value, is_active, effective_from, effective_to";

/// Store for structured, versioned payloads attached to entities.
#[derive(Clone)]
pub struct MetadataStore {
    db: Database,
}

impl MetadataStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Writes a document version: deactivates any existing active row for
    /// the key tuple, then inserts the new one. One logical operation.
    #[allow(clippy::too_many_arguments)]
    pub fn put(
        &self,
        org: OrganizationId,
        entity_type: &str,
        entity_id: EntityId,
        metadata_type: &str,
        category: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> StoreResult<MetadataDocument> {
        for (label, field) in [
            ("entity type", entity_type),
            ("metadata type", metadata_type),
            ("metadata category", category),
            ("metadata key", key),
        ] {
            if field.trim().is_empty() {
                return Err(StoreError::Validation(format!("{label} is empty")));
            }
        }

        let now = now_millis();
        let doc = MetadataDocument {
            id: MetadataId::new(),
            organization_id: org,
            entity_type: entity_type.to_string(),
            entity_id,
            metadata_type: metadata_type.to_string(),
            metadata_category: category.to_string(),
            metadata_key: key.to_string(),
            metadata_value: value.clone(),
            is_active: true,
            effective_from: now,
            effective_to: None,
        };
        let serialized = serde_json::to_string(value)?;

        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "UPDATE core_metadata SET is_active = 0, effective_to = ?1
             WHERE organization_id = ?2 AND entity_type = ?3 AND entity_id = ?4
               AND metadata_type = ?5 AND metadata_category = ?6 AND metadata_key = ?7
               AND is_active = 1",
            params![
                now,
                org.to_string(),
                entity_type,
                entity_id.to_string(),
                metadata_type,
                category,
                key,
            ],
        )?;
        tx.execute(
            "INSERT INTO core_metadata
             (id, organization_id, entity_type, entity_id, metadata_type, metadata_category,
              metadata_key, metadata_value, is_active, effective_from, effective_to)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, NULL)",
            params![
                doc.id.to_string(),
                org.to_string(),
                entity_type,
                entity_id.to_string(),
                metadata_type,
                category,
                key,
                serialized,
                now,
            ],
        )?;
        tx.commit()?;
        Ok(doc)
    }

    /// Fetches the single active document for a key tuple.
    #[allow(clippy::too_many_arguments)]
    pub fn get(
        &self,
        org: OrganizationId,
        entity_type: &str,
        entity_id: EntityId,
        metadata_type: &str,
        category: &str,
        key: &str,
    ) -> StoreResult<MetadataDocument> {
        let conn = self.db.lock();
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM core_metadata
             WHERE organization_id = ?1 AND entity_type = ?2 AND entity_id = ?3
               AND metadata_type = ?4 AND metadata_category = ?5 AND metadata_key = ?6
               AND is_active = 1"
        );
        let row = conn
            .query_row(
                &sql,
                params![
                    org.to_string(),
                    entity_type,
                    entity_id.to_string(),
                    metadata_type,
                    category,
                    key,
                ],
                read_metadata_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(format!(
                    "metadata {metadata_type}/{category}/{key} for entity {entity_id}"
                )),
                other => other.into(),
            })?;
        decode_metadata(row)
    }

    /// Batched fetch: all active documents of an entity type for many
    /// entities in one query.
    pub fn list_bulk(
        &self,
        org: OrganizationId,
        entity_ids: &[EntityId],
        entity_type: &str,
    ) -> StoreResult<Vec<MetadataDocument>> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }

        // ?1 = org, ?2 = entity type, ?3.. = entity ids
        let placeholders = entity_ids
            .iter()
            .enumerate()
            .map(|(i, _)| format!("?{}", i + 3))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM core_metadata
             WHERE organization_id = ?1 AND entity_type = ?2 AND is_active = 1
               AND entity_id IN ({placeholders})
             ORDER BY entity_id, metadata_type, metadata_category, metadata_key"
        );
        let values: Vec<String> = [org.to_string(), entity_type.to_string()]
            .into_iter()
            .chain(entity_ids.iter().map(ToString::to_string))
            .collect();

        let conn = self.db.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), read_metadata_row)?;

        let mut docs = Vec::new();
        for row in rows {
            docs.push(decode_metadata(row?)?);
        }
        Ok(docs)
    }

    /// Every version ever written for a key tuple, oldest first. The
    /// append-only history behind the single active document.
    #[allow(clippy::too_many_arguments)]
    pub fn history(
        &self,
        org: OrganizationId,
        entity_type: &str,
        entity_id: EntityId,
        metadata_type: &str,
        category: &str,
        key: &str,
    ) -> StoreResult<Vec<MetadataDocument>> {
        let conn = self.db.lock();
        let sql = format!(
            "SELECT {METADATA_COLUMNS} FROM core_metadata
             WHERE organization_id = ?1 AND entity_type = ?2 AND entity_id = ?3
               AND metadata_type = ?4 AND metadata_category = ?5 AND metadata_key = ?6
             ORDER BY effective_from ASC, id ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                org.to_string(),
                entity_type,
                entity_id.to_string(),
                metadata_type,
                category,
                key,
            ],
            read_metadata_row,
        )?;

        let mut docs = Vec::new();
        for row in rows {
            docs.push(decode_metadata(row?)?);
        }
        Ok(docs)
    }
}

type MetadataRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    bool,
    i64,
    Option<i64>,
);

fn read_metadata_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MetadataRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn decode_metadata(row: MetadataRow) -> StoreResult<MetadataDocument> {
    let (id, org, entity_type, entity_id, mtype, category, key, value, is_active, from, to) = row;
    Ok(MetadataDocument {
        id: MetadataId::parse(&id).map_err(|e| StoreError::Corrupt(format!("metadata id: {e}")))?,
        organization_id: OrganizationId::parse(&org)
            .map_err(|e| StoreError::Corrupt(format!("organization id: {e}")))?,
        entity_type,
        entity_id: EntityId::parse(&entity_id)
            .map_err(|e| StoreError::Corrupt(format!("entity id: {e}")))?,
        metadata_type: mtype,
        metadata_category: category,
        metadata_key: key,
        metadata_value: serde_json::from_str(&value)?,
        is_active,
        effective_from: from,
        effective_to: to,
    })
}
