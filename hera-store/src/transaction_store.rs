//! Store for business transactions (`universal_transactions` and their
//! lines).
//!
//! Transactions are immutable facts: once posted they are never edited, only
//! moved forward through the configured status workflow or superseded by new
//! transactions (refunds, corrections). The stored total is always computed
//! here from the lines — a caller-supplied total would drift.

use crate::error::{StoreError, StoreResult, is_constraint_violation};
use hera_db::Database;
use hera_model::{
    NewTransactionLine, StatusFlow, Transaction, TransactionLine, TransactionStatus,
};
use hera_types::{OrganizationId, TransactionId, now_millis};
use rusqlite::{Connection, params};

const TXN_COLUMNS: &str = "id, organization_id, transaction_type, transaction_number, \
     transaction_date, total_amount, currency, status, metadata, created_at";

/// Store for append-style business events with line items.
#[derive(Clone)]
pub struct TransactionStore {
    db: Database,
    flow: StatusFlow,
}

impl TransactionStore {
    /// The allowed-transition table is business configuration, supplied at
    /// construction; see [`StatusFlow::standard`] for the common workflow.
    pub fn new(db: Database, flow: StatusFlow) -> Self {
        Self { db, flow }
    }

    /// Creates a transaction with its lines in one database transaction.
    ///
    /// The total is computed as Σ quantity × unit price over the supplied
    /// lines, inside the same transaction as the inserts. The number must be
    /// unique per (organization, type). Initial status is `pending`.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &self,
        org: OrganizationId,
        transaction_type: &str,
        number: &str,
        date: i64,
        currency: &str,
        lines: &[NewTransactionLine],
        metadata: Option<&serde_json::Value>,
    ) -> StoreResult<Transaction> {
        if transaction_type.trim().is_empty() {
            return Err(StoreError::Validation("transaction type is empty".into()));
        }
        if number.trim().is_empty() {
            return Err(StoreError::Validation("transaction number is empty".into()));
        }
        if currency.trim().is_empty() {
            return Err(StoreError::Validation("currency is empty".into()));
        }
        if lines.is_empty() {
            return Err(StoreError::Validation("transaction has no lines".into()));
        }
        for line in lines {
            if !line.quantity.is_finite() || !line.unit_price.is_finite() {
                return Err(StoreError::Validation(format!(
                    "line {:?} has a non-finite quantity or price",
                    line.line_description
                )));
            }
        }

        let total: f64 = lines.iter().map(NewTransactionLine::amount).sum();
        let now = now_millis();
        let txn = Transaction {
            id: TransactionId::new(),
            organization_id: org,
            transaction_type: transaction_type.to_string(),
            transaction_number: number.to_string(),
            transaction_date: date,
            total_amount: total,
            currency: currency.to_string(),
            status: TransactionStatus::Pending,
            metadata: metadata.cloned(),
            created_at: now,
        };
        let serialized_meta = metadata.map(serde_json::to_string).transpose()?;

        let mut conn = self.db.lock();
        let tx = conn.transaction()?;

        let exists: bool = tx.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM universal_transactions
                WHERE organization_id = ?1 AND transaction_type = ?2 AND transaction_number = ?3)",
            params![org.to_string(), transaction_type, number],
            |row| row.get(0),
        )?;
        if exists {
            return Err(duplicate_number(transaction_type, number, org));
        }

        tx.execute(
            "INSERT INTO universal_transactions
             (id, organization_id, transaction_type, transaction_number, transaction_date,
              total_amount, currency, status, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                txn.id.to_string(),
                org.to_string(),
                transaction_type,
                number,
                date,
                total,
                currency,
                txn.status.as_str(),
                serialized_meta,
                now,
            ],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                duplicate_number(transaction_type, number, org)
            } else {
                e.into()
            }
        })?;

        for (order, line) in lines.iter().enumerate() {
            tx.execute(
                "INSERT INTO universal_transaction_lines
                 (transaction_id, entity_id, line_description, quantity, unit_price,
                  line_amount, line_order)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    txn.id.to_string(),
                    line.entity_id.map(|id| id.to_string()),
                    line.line_description,
                    line.quantity,
                    line.unit_price,
                    line.amount(),
                    order as i32,
                ],
            )?;
        }
        tx.commit()?;
        Ok(txn)
    }

    /// Moves a transaction forward through the configured workflow.
    /// Fails with `InvalidTransition` for anything the table does not allow.
    pub fn update_status(
        &self,
        org: OrganizationId,
        id: TransactionId,
        new_status: TransactionStatus,
    ) -> StoreResult<Transaction> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        let mut txn = fetch_transaction(&tx, org, id)?;

        if !self.flow.can_transition(txn.status, new_status) {
            return Err(StoreError::InvalidTransition {
                from: txn.status,
                to: new_status,
            });
        }

        tx.execute(
            "UPDATE universal_transactions SET status = ?1
             WHERE id = ?2 AND organization_id = ?3",
            params![new_status.as_str(), id.to_string(), org.to_string()],
        )?;
        tx.commit()?;
        tracing::debug!(%org, %id, from = %txn.status, to = %new_status, "transaction status changed");

        txn.status = new_status;
        Ok(txn)
    }

    /// One logical read: the transaction and all its lines, ordered by line
    /// index ascending.
    pub fn get_with_lines(
        &self,
        org: OrganizationId,
        id: TransactionId,
    ) -> StoreResult<(Transaction, Vec<TransactionLine>)> {
        let conn = self.db.lock();
        let txn = fetch_transaction(&conn, org, id)?;

        let mut stmt = conn.prepare(
            "SELECT transaction_id, entity_id, line_description, quantity, unit_price,
                    line_amount, line_order
             FROM universal_transaction_lines
             WHERE transaction_id = ?1
             ORDER BY line_order ASC",
        )?;
        let rows = stmt.query_map(params![id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, i32>(6)?,
            ))
        })?;

        let mut lines = Vec::new();
        for row in rows {
            let (txn_id, entity_id, description, quantity, unit_price, amount, order) = row?;
            lines.push(TransactionLine {
                transaction_id: hera_types::TransactionId::parse(&txn_id)
                    .map_err(|e| StoreError::Corrupt(format!("transaction id: {e}")))?,
                entity_id: entity_id
                    .map(|s| hera_types::EntityId::parse(&s))
                    .transpose()
                    .map_err(|e| StoreError::Corrupt(format!("entity id: {e}")))?,
                line_description: description,
                quantity,
                unit_price,
                line_amount: amount,
                line_order: order,
            });
        }
        Ok((txn, lines))
    }
}

fn duplicate_number(transaction_type: &str, number: &str, org: OrganizationId) -> StoreError {
    StoreError::DuplicateCode(format!(
        "{transaction_type}/{number} already exists in organization {org}"
    ))
}

type TxnRow = (
    String,
    String,
    String,
    String,
    i64,
    f64,
    String,
    String,
    Option<String>,
    i64,
);

fn fetch_transaction(
    conn: &Connection,
    org: OrganizationId,
    id: TransactionId,
) -> StoreResult<Transaction> {
    let sql = format!(
        "SELECT {TXN_COLUMNS} FROM universal_transactions
         WHERE id = ?1 AND organization_id = ?2"
    );
    let row: TxnRow = conn
        .query_row(&sql, params![id.to_string(), org.to_string()], |row| {
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
            ))
        })
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                StoreError::NotFound(format!("transaction {id}"))
            }
            other => other.into(),
        })?;

    let (row_id, row_org, ttype, number, date, total, currency, status, metadata, created_at) = row;
    Ok(Transaction {
        id: TransactionId::parse(&row_id)
            .map_err(|e| StoreError::Corrupt(format!("transaction id: {e}")))?,
        organization_id: OrganizationId::parse(&row_org)
            .map_err(|e| StoreError::Corrupt(format!("organization id: {e}")))?,
        transaction_type: ttype,
        transaction_number: number,
        transaction_date: date,
        total_amount: total,
        currency,
        status: TransactionStatus::parse(&status)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown status {status:?}")))?,
        metadata: metadata.map(|s| serde_json::from_str(&s)).transpose()?,
        created_at,
    })
}
