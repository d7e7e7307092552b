//! End-to-end flows across several stores sharing one database.

use hera_db::Database;
use hera_model::{FieldType, NewTransactionLine, StatusFlow, TransactionStatus};
use hera_store::{
    AttributeStore, EntityStore, MetadataStore, RelationshipStore, StoreError, TransactionStore,
};
use hera_types::OrganizationId;
use serde_json::json;

struct Stores {
    entities: EntityStore,
    attributes: AttributeStore,
    metadata: MetadataStore,
    relationships: RelationshipStore,
    transactions: TransactionStore,
}

fn stores() -> Stores {
    let db = Database::open_in_memory().unwrap();
    Stores {
        entities: EntityStore::new(db.clone()),
        attributes: AttributeStore::new(db.clone()),
        metadata: MetadataStore::new(db.clone()),
        relationships: RelationshipStore::new(db.clone()),
        transactions: TransactionStore::new(db, StatusFlow::standard()),
    }
}

#[test]
fn product_with_price_then_duplicate_code() {
    let s = stores();
    let org = OrganizationId::new();

    let product = s.entities.create(org, "product", "Tea", "SKU-1").unwrap();
    s.attributes.set(product.id, "price", "4.50", FieldType::Number).unwrap();

    let attrs = s.attributes.get(product.id).unwrap();
    let price = attrs.get("price").unwrap();
    assert_eq!(price.field_value, "4.50");
    assert_eq!(price.field_type, FieldType::Number);

    let err = s.entities.create(org, "product", "Tea Again", "SKU-1").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateCode(_)));
}

#[test]
fn metadata_supersede_flow() {
    let s = stores();
    let org = OrganizationId::new();
    let product = s.entities.create(org, "product", "Tea", "SKU-1").unwrap();

    s.metadata
        .put(org, "product", product.id, "details", "catalog", "info", &json!({"color": "red"}))
        .unwrap();
    s.metadata
        .put(org, "product", product.id, "details", "catalog", "info", &json!({"color": "blue"}))
        .unwrap();

    let doc = s
        .metadata
        .get(org, "product", product.id, "details", "catalog", "info")
        .unwrap();
    assert_eq!(doc.metadata_value, json!({"color": "blue"}));

    let versions = s
        .metadata
        .history(org, "product", product.id, "details", "catalog", "info")
        .unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions.iter().filter(|d| d.is_active).count(), 1);
}

#[test]
fn sales_order_references_products() {
    let s = stores();
    let org = OrganizationId::new();

    let tea = s.entities.create(org, "product", "Tea", "SKU-1").unwrap();
    let scone = s.entities.create(org, "product", "Scone", "SKU-2").unwrap();
    let menu = s.entities.create(org, "category", "Breakfast", "CAT-1").unwrap();
    s.relationships.create(org, "contains", menu.id, tea.id, None).unwrap();
    s.relationships.create(org, "contains", menu.id, scone.id, None).unwrap();

    let order = s
        .transactions
        .create(
            org,
            "SALES_ORDER",
            "ORD-1",
            1_700_000_000_000,
            "USD",
            &[
                NewTransactionLine::new("Tea", 2.0, 5.0).with_entity(tea.id),
                NewTransactionLine::new("Scone", 1.0, 3.0).with_entity(scone.id),
            ],
            None,
        )
        .unwrap();
    assert!((order.total_amount - 13.0).abs() < 1e-6);

    s.transactions.update_status(org, order.id, TransactionStatus::Processing).unwrap();
    s.transactions.update_status(org, order.id, TransactionStatus::Completed).unwrap();

    let (txn, lines) = s.transactions.get_with_lines(org, order.id).unwrap();
    assert_eq!(txn.status, TransactionStatus::Completed);
    assert_eq!(lines[0].entity_id, Some(tea.id));

    // Soft-deleting a product afterwards does not disturb the posted order.
    s.entities.deactivate(org, tea.id).unwrap();
    let (_, lines) = s.transactions.get_with_lines(org, order.id).unwrap();
    assert_eq!(lines.len(), 2);

    // The category still lists the item; active-parent filtering is the
    // caller's job on this path.
    assert_eq!(s.relationships.children(org, menu.id, "contains").unwrap().len(), 2);
}

#[test]
fn bulk_reads_for_a_listing_page() {
    let s = stores();
    let org = OrganizationId::new();

    let mut ids = Vec::new();
    for i in 0..4 {
        let e = s
            .entities
            .create(org, "product", format!("Item {i}").as_str(), &format!("SKU-{i}"))
            .unwrap();
        s.attributes.set(e.id, "price", &format!("{i}.00"), FieldType::Number).unwrap();
        s.metadata
            .put(org, "product", e.id, "details", "catalog", "info", &json!({"n": i}))
            .unwrap();
        ids.push(e.id);
    }

    let attrs = s.attributes.get_bulk(&ids).unwrap();
    assert_eq!(attrs.len(), 4);
    assert_eq!(attrs[&ids[2]].get_number("price").unwrap(), Some(2.0));

    let docs = s.metadata.list_bulk(org, &ids, "product").unwrap();
    assert_eq!(docs.len(), 4);
}
