//! Schema bootstrap for the five universal tables.
//!
//! Everything in the data core lives in these tables; new business object
//! kinds never require a migration, only a new `entity_type` string.

use crate::{DbError, DbResult};
use rusqlite::Connection;

pub(crate) fn init(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS core_entities (
            id TEXT PRIMARY KEY,
            organization_id TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_name TEXT NOT NULL,
            entity_code TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        -- Code uniqueness holds among ACTIVE entities only; superseded rows
        -- keep their code for history.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_entities_org_type_code
            ON core_entities(organization_id, entity_type, entity_code)
            WHERE is_active = 1;

        CREATE INDEX IF NOT EXISTS idx_entities_org_type
            ON core_entities(organization_id, entity_type);

        CREATE TABLE IF NOT EXISTS core_dynamic_data (
            entity_id TEXT NOT NULL,
            field_name TEXT NOT NULL,
            field_value TEXT NOT NULL,
            field_type TEXT NOT NULL,
            updated_at INTEGER NOT NULL,
            UNIQUE(entity_id, field_name)
        );

        CREATE TABLE IF NOT EXISTS core_metadata (
            id TEXT PRIMARY KEY,
            organization_id TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            metadata_type TEXT NOT NULL,
            metadata_category TEXT NOT NULL,
            metadata_key TEXT NOT NULL,
            metadata_value TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            effective_from INTEGER NOT NULL,
            effective_to INTEGER
        );

        -- At most one ACTIVE document per key tuple; a racing second insert
        -- hits this index instead of creating a duplicate version.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_metadata_active_key
            ON core_metadata(organization_id, entity_type, entity_id,
                             metadata_type, metadata_category, metadata_key)
            WHERE is_active = 1;

        CREATE INDEX IF NOT EXISTS idx_metadata_entity
            ON core_metadata(entity_id);

        CREATE TABLE IF NOT EXISTS core_relationships (
            id TEXT PRIMARY KEY,
            organization_id TEXT NOT NULL,
            relationship_type TEXT NOT NULL,
            parent_entity_id TEXT NOT NULL,
            child_entity_id TEXT NOT NULL,
            relationship_data TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_relationships_parent
            ON core_relationships(organization_id, parent_entity_id, relationship_type);

        CREATE INDEX IF NOT EXISTS idx_relationships_child
            ON core_relationships(organization_id, child_entity_id, relationship_type);

        CREATE TABLE IF NOT EXISTS universal_transactions (
            id TEXT PRIMARY KEY,
            organization_id TEXT NOT NULL,
            transaction_type TEXT NOT NULL,
            transaction_number TEXT NOT NULL,
            transaction_date INTEGER NOT NULL,
            total_amount REAL NOT NULL,
            currency TEXT NOT NULL,
            status TEXT NOT NULL,
            metadata TEXT,
            created_at INTEGER NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_txn_org_type_number
            ON universal_transactions(organization_id, transaction_type, transaction_number);

        CREATE TABLE IF NOT EXISTS universal_transaction_lines (
            transaction_id TEXT NOT NULL,
            entity_id TEXT,
            line_description TEXT NOT NULL,
            quantity REAL NOT NULL,
            unit_price REAL NOT NULL,
            line_amount REAL NOT NULL,
            line_order INTEGER NOT NULL,
            UNIQUE(transaction_id, line_order)
        );
        ",
    )
    .map_err(|e| DbError::Schema(format!("failed to init universal tables: {e}")))?;
    Ok(())
}
