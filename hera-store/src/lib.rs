//! The five universal stores of the HERA data core.
//!
//! Every business object is represented through the same five tables, so no
//! feature ever needs a schema migration:
//! - [`EntityStore`] — the root records (products, customers, staff, ...)
//! - [`AttributeStore`] — open-ended typed key/value extension data
//! - [`MetadataStore`] — versioned structured documents, single-active per key
//! - [`RelationshipStore`] — typed directed edges between entities
//! - [`TransactionStore`] — immutable business events with line items
//!
//! All stores are handles over one shared [`hera_db::Database`] connection;
//! multi-step writes (entity plus initial attributes, metadata supersede plus
//! insert, transaction header plus lines) each run inside a single SQLite
//! transaction.
//!
//! Deletion is always a soft flag flip. Deactivating an entity deliberately
//! leaves its attributes, metadata, and relationships in place (callers must
//! filter on the parent's active flag); `EntityStore::deactivate_cascade`
//! exists for callers that want dependents hidden transactionally.

mod attribute_store;
mod entity_store;
mod error;
mod metadata_store;
mod relationship_store;
mod transaction_store;

pub use attribute_store::AttributeStore;
pub use entity_store::{EntityStore, NewAttribute};
pub use error::{StoreError, StoreResult};
pub use metadata_store::MetadataStore;
pub use relationship_store::RelationshipStore;
pub use transaction_store::TransactionStore;
