//! Pluggable duplicate rules.
//!
//! A [`DuplicateRule`] is one screen over a candidate. Most entity types
//! need nothing beyond the generic code check; types with business-level
//! identity (customers, suppliers, invoices) register a rule keyed by their
//! entity type.

use crate::checker::EntityCandidate;
use crate::result::{CheckOutcome, DuplicateAction};
use hera_store::{AttributeStore, EntityStore, StoreResult};
use hera_types::{EntityId, OrganizationId};

/// Read-only store access handed to rules.
pub struct RuleContext<'a> {
    pub entities: &'a EntityStore,
    pub attributes: &'a AttributeStore,
}

/// One duplicate screen over a candidate entity.
pub trait DuplicateRule: Send + Sync {
    /// Short name reported as the `duplicate_type` of a finding.
    fn name(&self) -> &str;

    /// Screens the candidate. Rules only read; they never write.
    fn check(
        &self,
        ctx: &RuleContext<'_>,
        org: OrganizationId,
        candidate: &EntityCandidate,
    ) -> StoreResult<CheckOutcome>;
}

/// The always-allow stub. Default for the attribute-level screen and for
/// entity types with no registered business rule.
pub struct AlwaysAllow;

impl DuplicateRule for AlwaysAllow {
    fn name(&self) -> &str {
        "always_allow"
    }

    fn check(
        &self,
        _ctx: &RuleContext<'_>,
        _org: OrganizationId,
        _candidate: &EntityCandidate,
    ) -> StoreResult<CheckOutcome> {
        Ok(CheckOutcome::allow())
    }
}

/// Flags candidates whose identifying attributes collide with an existing
/// active entity — e.g. customer email, phone, or tax id.
///
/// All configured fields are screened; a hit on any of them triggers the
/// configured action, and every colliding entity id is reported.
pub struct AttributeMatchRule {
    name: String,
    fields: Vec<String>,
    action: DuplicateAction,
}

impl AttributeMatchRule {
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
        action: DuplicateAction,
    ) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            action,
        }
    }
}

impl DuplicateRule for AttributeMatchRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(
        &self,
        ctx: &RuleContext<'_>,
        org: OrganizationId,
        candidate: &EntityCandidate,
    ) -> StoreResult<CheckOutcome> {
        let mut hits: Vec<EntityId> = Vec::new();
        let mut matched_fields: Vec<&str> = Vec::new();

        for field in &self.fields {
            let Some(value) = candidate.attributes.get(field) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            let ids = ctx.attributes.find_entities_with_value(
                org,
                &candidate.entity_type,
                field,
                value,
            )?;
            if !ids.is_empty() {
                matched_fields.push(field);
                for id in ids {
                    if !hits.contains(&id) {
                        hits.push(id);
                    }
                }
            }
        }

        if hits.is_empty() {
            Ok(CheckOutcome::allow())
        } else {
            Ok(CheckOutcome::found(
                self.action,
                hits,
                format!("attribute collision on {}", matched_fields.join(", ")),
            ))
        }
    }
}
