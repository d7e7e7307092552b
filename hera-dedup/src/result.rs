use hera_types::EntityId;
use serde::{Deserialize, Serialize};

/// What to do with a candidate write.
///
/// Variant order IS the precedence order: combining outcomes takes the
/// maximum, so any `Reject` dominates everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateAction {
    Allow,
    ManualReview,
    MergeOrReject,
    Reject,
}

impl DuplicateAction {
    /// Combines any number of actions by precedence. An empty set is Allow.
    pub fn combine(actions: impl IntoIterator<Item = DuplicateAction>) -> DuplicateAction {
        actions.into_iter().max().unwrap_or(DuplicateAction::Allow)
    }
}

/// The outcome of one individual screen.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub action: DuplicateAction,
    pub duplicate_ids: Vec<EntityId>,
    pub reason: Option<String>,
}

impl CheckOutcome {
    /// A clean pass.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            action: DuplicateAction::Allow,
            duplicate_ids: Vec::new(),
            reason: None,
        }
    }

    /// A finding with the given action and the ids that collided.
    pub fn found(
        action: DuplicateAction,
        duplicate_ids: Vec<EntityId>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            action,
            duplicate_ids,
            reason: Some(reason.into()),
        }
    }
}

/// Combined result of all screens for one candidate.
#[derive(Debug, Clone)]
pub struct DuplicateCheckResult {
    pub has_duplicates: bool,
    /// Which screen produced the winning finding (e.g. "entity_code").
    pub duplicate_type: Option<String>,
    pub duplicate_ids: Vec<EntityId>,
    pub action: DuplicateAction,
}
