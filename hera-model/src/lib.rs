//! Universal data shapes for the HERA data core.
//!
//! Defines the types shared by every store:
//! - [`Entity`] — the generic tenant-scoped business record (the root of all
//!   other data), plus [`EntityPatch`]/[`EntityFilter`]/[`EntitySort`]
//! - [`Attribute`]/[`AttributeMap`] — schema-less typed key/value extension
//!   data with the documented coercion policy
//! - [`MetadataDocument`] — versioned structured payloads keyed by
//!   type/category/key
//! - [`Relationship`] — typed directed edges between entities
//! - [`Transaction`]/[`TransactionLine`] — immutable business events with a
//!   configurable status workflow ([`StatusFlow`])
//!
//! These types carry no persistence logic; the stores in `hera-store` map
//! them to and from the five universal tables.

mod attribute;
mod entity;
mod metadata;
mod relationship;
mod transaction;

pub use attribute::{Attribute, AttributeMap, AttributeParseError, FieldType};
pub use entity::{Entity, EntityFilter, EntityPatch, EntitySort, EntitySortField};
pub use metadata::MetadataDocument;
pub use relationship::Relationship;
pub use transaction::{
    NewTransactionLine, StatusFlow, Transaction, TransactionLine, TransactionStatus,
};
