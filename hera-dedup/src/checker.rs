//! The combined duplicate checker.

use crate::result::{CheckOutcome, DuplicateAction, DuplicateCheckResult};
use crate::rules::{AlwaysAllow, DuplicateRule, RuleContext};
use hera_model::{EntityFilter, EntitySort};
use hera_store::{AttributeStore, EntityStore, StoreResult};
use hera_types::{EntityId, OrganizationId};
use std::collections::HashMap;

/// A candidate entity, screened before any write happens.
#[derive(Debug, Clone)]
pub struct EntityCandidate {
    pub entity_type: String,
    pub entity_name: String,
    pub entity_code: String,
    /// Intended initial attributes, as (field name, value) pairs.
    pub attributes: HashMap<String, String>,
}

impl EntityCandidate {
    pub fn new(
        entity_type: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_name: name.into(),
            entity_code: code.into(),
            attributes: HashMap::new(),
        }
    }

    /// Adds an intended attribute to the candidate.
    #[must_use]
    pub fn with_attribute(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }
}

/// Screens candidates through the code check, the per-entity-type business
/// rule, and the attribute-level rule, combining outcomes by precedence.
pub struct DuplicateChecker {
    entities: EntityStore,
    attributes: AttributeStore,
    business_rules: HashMap<String, Box<dyn DuplicateRule>>,
    attribute_rule: Box<dyn DuplicateRule>,
}

impl DuplicateChecker {
    /// A checker with no business rules and the always-allow attribute
    /// screen.
    pub fn new(entities: EntityStore, attributes: AttributeStore) -> Self {
        Self {
            entities,
            attributes,
            business_rules: HashMap::new(),
            attribute_rule: Box::new(AlwaysAllow),
        }
    }

    /// Registers the business rule for one entity type. Types without a
    /// registered rule default to allow (visibly, at debug level).
    pub fn register_rule(&mut self, entity_type: impl Into<String>, rule: Box<dyn DuplicateRule>) {
        self.business_rules.insert(entity_type.into(), rule);
    }

    /// Replaces the attribute-level screen (an always-allow stub by
    /// default).
    pub fn set_attribute_rule(&mut self, rule: Box<dyn DuplicateRule>) {
        self.attribute_rule = rule;
    }

    /// Screens a candidate. Performs no writes.
    pub fn check(
        &self,
        org: OrganizationId,
        candidate: &EntityCandidate,
    ) -> StoreResult<DuplicateCheckResult> {
        let ctx = RuleContext {
            entities: &self.entities,
            attributes: &self.attributes,
        };

        let code_outcome = self.check_code(org, candidate)?;

        let business_outcome = match self.business_rules.get(&candidate.entity_type) {
            Some(rule) => ("business_rule", rule.check(&ctx, org, candidate)?),
            None => {
                tracing::debug!(
                    entity_type = %candidate.entity_type,
                    "no duplicate rule registered, defaulting to allow"
                );
                ("business_rule", CheckOutcome::allow())
            }
        };

        let attribute_outcome = (
            "attribute_rule",
            self.attribute_rule.check(&ctx, org, candidate)?,
        );

        Ok(combine(vec![
            ("entity_code", code_outcome),
            business_outcome,
            attribute_outcome,
        ]))
    }

    /// Exact (organization, type, code) collision among active entities.
    fn check_code(
        &self,
        org: OrganizationId,
        candidate: &EntityCandidate,
    ) -> StoreResult<CheckOutcome> {
        let filter = EntityFilter {
            code: Some(candidate.entity_code.clone()),
            ..Default::default()
        };
        let matches =
            self.entities
                .list(org, &candidate.entity_type, &filter, EntitySort::default())?;
        if matches.is_empty() {
            Ok(CheckOutcome::allow())
        } else {
            let ids = matches.iter().map(|e| e.id).collect();
            Ok(CheckOutcome::found(
                DuplicateAction::Reject,
                ids,
                format!("entity code {:?} already in use", candidate.entity_code),
            ))
        }
    }
}

/// Combines named outcomes: the action is the precedence maximum, the ids
/// accumulate across all findings, and `duplicate_type` names the screen
/// whose finding carried the winning action.
fn combine(outcomes: Vec<(&str, CheckOutcome)>) -> DuplicateCheckResult {
    let action = DuplicateAction::combine(outcomes.iter().map(|(_, o)| o.action));

    let mut duplicate_ids: Vec<EntityId> = Vec::new();
    let mut duplicate_type: Option<String> = None;
    for (name, outcome) in &outcomes {
        if !outcome.duplicate_ids.is_empty() {
            if duplicate_type.is_none() && outcome.action == action {
                duplicate_type = Some((*name).to_string());
            }
            for id in &outcome.duplicate_ids {
                if !duplicate_ids.contains(id) {
                    duplicate_ids.push(*id);
                }
            }
        }
    }

    DuplicateCheckResult {
        has_duplicates: !duplicate_ids.is_empty(),
        duplicate_type,
        duplicate_ids,
        action,
    }
}
