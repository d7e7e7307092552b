use hera_types::{EntityId, OrganizationId};
use serde::{Deserialize, Serialize};

/// A generic, typed business record scoped to an organization.
///
/// Every business object (product, customer, staff member, GL account, ...)
/// is one of these; `entity_type` discriminates, and all extension data lives
/// in dynamic attributes and metadata documents keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub organization_id: OrganizationId,
    pub entity_type: String,
    pub entity_name: String,
    /// Human-readable code, unique within (organization, type) among active
    /// entities.
    pub entity_code: String,
    /// Soft-delete flag. Entities are never physically removed.
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A partial update to an entity. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct EntityPatch {
    pub entity_name: Option<String>,
    pub entity_code: Option<String>,
    pub is_active: Option<bool>,
}

impl EntityPatch {
    /// Patch that renames the entity.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            entity_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Patch that changes the entity code (uniqueness is re-validated).
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            entity_code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Adds a name change to this patch.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    /// Adds a code change to this patch.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.entity_code = Some(code.into());
        self
    }

    /// Adds an active-flag change to this patch.
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.entity_name.is_none() && self.entity_code.is_none() && self.is_active.is_none()
    }
}

/// Filter for entity listings. Defaults to "all active entities of the type."
#[derive(Debug, Clone, Default)]
pub struct EntityFilter {
    /// Case-sensitive substring match on the entity name.
    pub name_contains: Option<String>,
    /// Exact match on the entity code.
    pub code: Option<String>,
    /// Include soft-deleted rows.
    pub include_inactive: bool,
}

/// Sortable top-level entity columns. Listing queries only ever interpolate
/// these fixed column names, never caller strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySortField {
    Name,
    Code,
    CreatedAt,
    UpdatedAt,
}

impl EntitySortField {
    /// The backing column name.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "entity_name",
            Self::Code => "entity_code",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort order for entity listings. Defaults to name, ascending.
#[derive(Debug, Clone, Copy)]
pub struct EntitySort {
    pub field: EntitySortField,
    pub descending: bool,
}

impl Default for EntitySort {
    fn default() -> Self {
        Self {
            field: EntitySortField::Name,
            descending: false,
        }
    }
}

impl EntitySort {
    /// Ascending sort on the given field.
    pub fn asc(field: EntitySortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    /// Descending sort on the given field.
    pub fn desc(field: EntitySortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}
