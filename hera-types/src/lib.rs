//! Core type definitions for the HERA universal data core.
//!
//! This crate defines the fundamental, domain-agnostic types used throughout
//! the data layer:
//! - Organization, entity, metadata, relationship, and transaction
//!   identifiers (UUID v7)
//! - Wall-clock millisecond timestamps
//!
//! All domain-specific shapes (entities, attributes, transactions, etc.)
//! belong in `hera-model`, not here.

mod ids;
mod timestamp;

pub use ids::{EntityId, MetadataId, OrganizationId, RelationshipId, TransactionId};
pub use timestamp::now_millis;
