//! Duplicate prevention for the HERA universal stores.
//!
//! Write paths consult a [`DuplicateChecker`] before committing a new
//! entity. The checker runs three screens and combines their outcomes:
//! 1. exact entity-code collision against the entity store
//! 2. the registered per-entity-type business rule (customer email/phone
//!    collisions and the like) — unregistered types default to allow
//! 3. a pluggable attribute-level rule — ships as an always-allow stub and
//!    exists as an extension point
//!
//! Outcome precedence is `Reject > MergeOrReject > ManualReview > Allow`:
//! any reject anywhere forces an overall reject. The layer performs no
//! writes itself.

mod checker;
mod result;
mod rules;

pub use checker::{DuplicateChecker, EntityCandidate};
pub use result::{CheckOutcome, DuplicateAction, DuplicateCheckResult};
pub use rules::{AlwaysAllow, AttributeMatchRule, DuplicateRule, RuleContext};
