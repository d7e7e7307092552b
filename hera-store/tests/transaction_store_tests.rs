use hera_db::Database;
use hera_model::{NewTransactionLine, StatusFlow, TransactionStatus};
use hera_store::{StoreError, TransactionStore};
use hera_types::{EntityId, OrganizationId, TransactionId};
use serde_json::json;

fn store() -> TransactionStore {
    TransactionStore::new(Database::open_in_memory().unwrap(), StatusFlow::standard())
}

fn lines() -> Vec<NewTransactionLine> {
    vec![
        NewTransactionLine::new("Tea", 2.0, 5.0),
        NewTransactionLine::new("Scone", 1.0, 3.0),
    ]
}

// ── Creation & totals ────────────────────────────────────────────

#[test]
fn total_is_sum_of_line_amounts() {
    let store = store();
    let org = OrganizationId::new();
    let txn = store
        .create(org, "SALES_ORDER", "ORD-1", 1_700_000_000_000, "USD", &lines(), None)
        .unwrap();
    // 2 * 5 + 1 * 3
    assert!((txn.total_amount - 13.0).abs() < 1e-6);
    assert_eq!(txn.status, TransactionStatus::Pending);
}

#[test]
fn total_ignores_caller_arithmetic() {
    // Fractional quantities: the store computes, the caller never supplies.
    let store = store();
    let org = OrganizationId::new();
    let txn = store
        .create(
            org,
            "SALES_ORDER",
            "ORD-1",
            0,
            "USD",
            &[
                NewTransactionLine::new("Loose tea (kg)", 0.25, 40.0),
                NewTransactionLine::new("Honey", 3.0, 2.5),
            ],
            None,
        )
        .unwrap();
    assert!((txn.total_amount - 17.5).abs() < 1e-6);
}

#[test]
fn number_unique_per_org_and_type() {
    let store = store();
    let org = OrganizationId::new();
    store.create(org, "SALES_ORDER", "ORD-1", 0, "USD", &lines(), None).unwrap();

    let err = store
        .create(org, "SALES_ORDER", "ORD-1", 0, "USD", &lines(), None)
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateCode(_)));

    // Same number under a different type or org is fine.
    store.create(org, "PAYMENT", "ORD-1", 0, "USD", &lines(), None).unwrap();
    store
        .create(OrganizationId::new(), "SALES_ORDER", "ORD-1", 0, "USD", &lines(), None)
        .unwrap();
}

#[test]
fn validation_errors() {
    let store = store();
    let org = OrganizationId::new();
    assert!(matches!(
        store.create(org, "SALES_ORDER", "", 0, "USD", &lines(), None),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.create(org, "SALES_ORDER", "ORD-1", 0, "USD", &[], None),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.create(
            org,
            "SALES_ORDER",
            "ORD-1",
            0,
            "USD",
            &[NewTransactionLine::new("Tea", f64::NAN, 1.0)],
            None,
        ),
        Err(StoreError::Validation(_))
    ));
}

// ── Read with lines ──────────────────────────────────────────────

#[test]
fn get_with_lines_ordered_ascending() {
    let store = store();
    let org = OrganizationId::new();
    let product = EntityId::new();
    let created = store
        .create(
            org,
            "SALES_ORDER",
            "ORD-1",
            0,
            "USD",
            &[
                NewTransactionLine::new("Tea", 2.0, 5.0).with_entity(product),
                NewTransactionLine::new("Scone", 1.0, 3.0),
                NewTransactionLine::new("Jam", 1.0, 1.5),
            ],
            Some(&json!({"table": 7})),
        )
        .unwrap();

    let (txn, lines) = store.get_with_lines(org, created.id).unwrap();
    assert_eq!(txn.metadata, Some(json!({"table": 7})));
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].line_order, 0);
    assert_eq!(lines[0].line_description, "Tea");
    assert_eq!(lines[0].entity_id, Some(product));
    assert!((lines[0].line_amount - 10.0).abs() < 1e-6);
    assert_eq!(lines[2].line_description, "Jam");

    let sum: f64 = lines.iter().map(|l| l.line_amount).sum();
    assert!((txn.total_amount - sum).abs() < 1e-6);
}

#[test]
fn get_missing_is_not_found() {
    let store = store();
    assert!(matches!(
        store.get_with_lines(OrganizationId::new(), TransactionId::new()),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn get_is_tenant_scoped() {
    let store = store();
    let org = OrganizationId::new();
    let txn = store.create(org, "SALES_ORDER", "ORD-1", 0, "USD", &lines(), None).unwrap();
    assert!(matches!(
        store.get_with_lines(OrganizationId::new(), txn.id),
        Err(StoreError::NotFound(_))
    ));
}

// ── Status workflow ──────────────────────────────────────────────

#[test]
fn forward_transitions_succeed() {
    let store = store();
    let org = OrganizationId::new();
    let txn = store.create(org, "SALES_ORDER", "ORD-1", 0, "USD", &lines(), None).unwrap();

    let t = store.update_status(org, txn.id, TransactionStatus::Processing).unwrap();
    assert_eq!(t.status, TransactionStatus::Processing);
    let t = store.update_status(org, txn.id, TransactionStatus::Completed).unwrap();
    assert_eq!(t.status, TransactionStatus::Completed);

    let (read_back, _) = store.get_with_lines(org, txn.id).unwrap();
    assert_eq!(read_back.status, TransactionStatus::Completed);
}

#[test]
fn backward_and_skip_transitions_rejected() {
    let store = store();
    let org = OrganizationId::new();
    let txn = store.create(org, "SALES_ORDER", "ORD-1", 0, "USD", &lines(), None).unwrap();

    // Skip: pending -> completed
    let err = store.update_status(org, txn.id, TransactionStatus::Completed).unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidTransition {
            from: TransactionStatus::Pending,
            to: TransactionStatus::Completed,
        }
    ));

    store.update_status(org, txn.id, TransactionStatus::Processing).unwrap();
    // Backward: processing -> pending
    let err = store.update_status(org, txn.id, TransactionStatus::Pending).unwrap_err();
    assert!(matches!(err, StoreError::InvalidTransition { .. }));
}

#[test]
fn workflow_is_configuration() {
    // A flow that allows direct completion from pending.
    let flow = StatusFlow::new().allow(TransactionStatus::Pending, TransactionStatus::Completed);
    let store = TransactionStore::new(Database::open_in_memory().unwrap(), flow);
    let org = OrganizationId::new();
    let txn = store.create(org, "SALES_ORDER", "ORD-1", 0, "USD", &lines(), None).unwrap();
    store.update_status(org, txn.id, TransactionStatus::Completed).unwrap();
}

#[test]
fn cancellation_paths() {
    let store = store();
    let org = OrganizationId::new();
    let t1 = store.create(org, "SALES_ORDER", "ORD-1", 0, "USD", &lines(), None).unwrap();
    store.update_status(org, t1.id, TransactionStatus::Cancelled).unwrap();

    let t2 = store.create(org, "SALES_ORDER", "ORD-2", 0, "USD", &lines(), None).unwrap();
    store.update_status(org, t2.id, TransactionStatus::Processing).unwrap();
    store.update_status(org, t2.id, TransactionStatus::Cancelled).unwrap();

    // Cancelled is terminal in the standard flow.
    assert!(matches!(
        store.update_status(org, t1.id, TransactionStatus::Pending),
        Err(StoreError::InvalidTransition { .. })
    ));
}
