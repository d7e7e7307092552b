use hera_db::Database;
use hera_store::{RelationshipStore, StoreError};
use hera_types::{EntityId, OrganizationId, RelationshipId};
use serde_json::json;

fn store() -> RelationshipStore {
    RelationshipStore::new(Database::open_in_memory().unwrap())
}

// ── Creation ─────────────────────────────────────────────────────

#[test]
fn create_and_traverse_both_directions() {
    let store = store();
    let org = OrganizationId::new();
    let category = EntityId::new();
    let item = EntityId::new();

    store.create(org, "contains", category, item, None).unwrap();

    assert_eq!(store.children(org, category, "contains").unwrap(), vec![item]);
    assert_eq!(store.parents(org, item, "contains").unwrap(), vec![category]);
}

#[test]
fn payload_round_trip() {
    let store = store();
    let org = OrganizationId::new();
    let rel = store
        .create(
            org,
            "has_gl_intelligence",
            EntityId::new(),
            EntityId::new(),
            Some(&json!({"confidence": 0.93})),
        )
        .unwrap();
    assert_eq!(rel.relationship_data, Some(json!({"confidence": 0.93})));
}

#[test]
fn empty_type_is_validation_error() {
    let store = store();
    assert!(matches!(
        store.create(OrganizationId::new(), "", EntityId::new(), EntityId::new(), None),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn no_generic_uniqueness() {
    // Two active edges of the same type on one parent are allowed;
    // per-type uniqueness is the caller's business rule.
    let store = store();
    let org = OrganizationId::new();
    let parent = EntityId::new();
    store.create(org, "contains", parent, EntityId::new(), None).unwrap();
    store.create(org, "contains", parent, EntityId::new(), None).unwrap();
    assert_eq!(store.children(org, parent, "contains").unwrap().len(), 2);
}

// ── Caller-side uniqueness helper ────────────────────────────────

#[test]
fn active_exists_reflects_edges() {
    let store = store();
    let org = OrganizationId::new();
    let parent = EntityId::new();

    assert!(!store.active_exists(org, "has_gl_intelligence", parent).unwrap());
    let rel = store
        .create(org, "has_gl_intelligence", parent, EntityId::new(), None)
        .unwrap();
    assert!(store.active_exists(org, "has_gl_intelligence", parent).unwrap());

    store.deactivate(org, rel.id).unwrap();
    assert!(!store.active_exists(org, "has_gl_intelligence", parent).unwrap());
}

// ── Filtering ────────────────────────────────────────────────────

#[test]
fn traversal_filters_by_type_and_active() {
    let store = store();
    let org = OrganizationId::new();
    let parent = EntityId::new();
    let a = EntityId::new();
    let b = EntityId::new();

    let rel_a = store.create(org, "contains", parent, a, None).unwrap();
    store.create(org, "supersedes", parent, b, None).unwrap();

    assert_eq!(store.children(org, parent, "contains").unwrap(), vec![a]);

    store.deactivate(org, rel_a.id).unwrap();
    assert!(store.children(org, parent, "contains").unwrap().is_empty());
}

#[test]
fn traversal_is_tenant_scoped() {
    let store = store();
    let org = OrganizationId::new();
    let parent = EntityId::new();
    store.create(org, "contains", parent, EntityId::new(), None).unwrap();

    assert!(
        store
            .children(OrganizationId::new(), parent, "contains")
            .unwrap()
            .is_empty()
    );
}

// ── Deactivation ─────────────────────────────────────────────────

#[test]
fn deactivate_missing_is_not_found() {
    let store = store();
    assert!(matches!(
        store.deactivate(OrganizationId::new(), RelationshipId::new()),
        Err(StoreError::NotFound(_))
    ));
}
