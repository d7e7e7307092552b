use hera_model::{NewTransactionLine, StatusFlow, TransactionStatus};
use hera_types::EntityId;

// ── StatusFlow ───────────────────────────────────────────────────

#[test]
fn empty_flow_permits_nothing() {
    let flow = StatusFlow::new();
    assert!(!flow.can_transition(TransactionStatus::Pending, TransactionStatus::Processing));
}

#[test]
fn standard_flow_forward_transitions() {
    let flow = StatusFlow::standard();
    assert!(flow.can_transition(TransactionStatus::Pending, TransactionStatus::Processing));
    assert!(flow.can_transition(TransactionStatus::Pending, TransactionStatus::Cancelled));
    assert!(flow.can_transition(TransactionStatus::Processing, TransactionStatus::Completed));
    assert!(flow.can_transition(TransactionStatus::Processing, TransactionStatus::Cancelled));
}

#[test]
fn standard_flow_rejects_backward_and_skip() {
    let flow = StatusFlow::standard();
    // Backward
    assert!(!flow.can_transition(TransactionStatus::Processing, TransactionStatus::Pending));
    assert!(!flow.can_transition(TransactionStatus::Completed, TransactionStatus::Processing));
    // Skip
    assert!(!flow.can_transition(TransactionStatus::Pending, TransactionStatus::Completed));
    // Terminal states go nowhere
    assert!(!flow.can_transition(TransactionStatus::Completed, TransactionStatus::Cancelled));
    assert!(!flow.can_transition(TransactionStatus::Cancelled, TransactionStatus::Pending));
}

#[test]
fn custom_flow_is_configuration() {
    // A business that allows reopening cancelled orders.
    let flow = StatusFlow::standard().allow(TransactionStatus::Cancelled, TransactionStatus::Pending);
    assert!(flow.can_transition(TransactionStatus::Cancelled, TransactionStatus::Pending));
}

// ── Status tags ──────────────────────────────────────────────────

#[test]
fn status_tag_round_trip() {
    for s in [
        TransactionStatus::Pending,
        TransactionStatus::Processing,
        TransactionStatus::Completed,
        TransactionStatus::Cancelled,
    ] {
        assert_eq!(TransactionStatus::parse(s.as_str()), Some(s));
    }
}

#[test]
fn unknown_status_tag_is_none() {
    assert_eq!(TransactionStatus::parse("shipped"), None);
}

// ── Lines ────────────────────────────────────────────────────────

#[test]
fn line_amount_is_quantity_times_price() {
    let line = NewTransactionLine::new("Tea", 2.0, 4.5);
    assert!((line.amount() - 9.0).abs() < 1e-9);
}

#[test]
fn line_entity_reference() {
    let id = EntityId::new();
    let line = NewTransactionLine::new("Tea", 1.0, 4.5).with_entity(id);
    assert_eq!(line.entity_id, Some(id));
}
