use hera_model::{EntityFilter, EntityPatch, EntitySort, EntitySortField};

// ── EntityPatch ──────────────────────────────────────────────────

#[test]
fn default_patch_is_empty() {
    assert!(EntityPatch::default().is_empty());
}

#[test]
fn patch_builders() {
    let p = EntityPatch::name("Green Tea").with_code("SKU-2").with_active(false);
    assert_eq!(p.entity_name.as_deref(), Some("Green Tea"));
    assert_eq!(p.entity_code.as_deref(), Some("SKU-2"));
    assert_eq!(p.is_active, Some(false));
    assert!(!p.is_empty());
}

#[test]
fn code_only_patch() {
    let p = EntityPatch::code("SKU-9");
    assert!(p.entity_name.is_none());
    assert_eq!(p.entity_code.as_deref(), Some("SKU-9"));
}

// ── EntityFilter / EntitySort ────────────────────────────────────

#[test]
fn default_filter_excludes_inactive() {
    let f = EntityFilter::default();
    assert!(!f.include_inactive);
    assert!(f.name_contains.is_none());
    assert!(f.code.is_none());
}

#[test]
fn default_sort_is_name_ascending() {
    let s = EntitySort::default();
    assert_eq!(s.field, EntitySortField::Name);
    assert!(!s.descending);
}

#[test]
fn sort_field_columns_are_fixed() {
    assert_eq!(EntitySortField::Name.column(), "entity_name");
    assert_eq!(EntitySortField::Code.column(), "entity_code");
    assert_eq!(EntitySortField::CreatedAt.column(), "created_at");
    assert_eq!(EntitySortField::UpdatedAt.column(), "updated_at");
}
