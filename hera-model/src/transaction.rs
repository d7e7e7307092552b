//! Business transactions: immutable events with line items and a
//! configurable forward-only status workflow.

use hera_types::{EntityId, OrganizationId, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Lifecycle status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    /// The tag persisted in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a stored tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The allowed-transition table for transaction statuses.
///
/// Which transitions are legal is business configuration, not store logic:
/// the store is constructed with one of these and rejects anything the table
/// does not allow. [`StatusFlow::standard`] covers the common
/// pending → processing → completed/cancelled workflow.
#[derive(Debug, Clone, Default)]
pub struct StatusFlow {
    allowed: HashMap<TransactionStatus, HashSet<TransactionStatus>>,
}

impl StatusFlow {
    /// An empty flow that permits no transitions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The default restaurant-order workflow:
    /// pending → processing | cancelled, processing → completed | cancelled.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .allow(TransactionStatus::Pending, TransactionStatus::Processing)
            .allow(TransactionStatus::Pending, TransactionStatus::Cancelled)
            .allow(TransactionStatus::Processing, TransactionStatus::Completed)
            .allow(TransactionStatus::Processing, TransactionStatus::Cancelled)
    }

    /// Permits a transition from `from` to `to`.
    #[must_use]
    pub fn allow(mut self, from: TransactionStatus, to: TransactionStatus) -> Self {
        self.allowed.entry(from).or_default().insert(to);
        self
    }

    /// True when the table permits `from` → `to`.
    pub fn can_transition(&self, from: TransactionStatus, to: TransactionStatus) -> bool {
        self.allowed.get(&from).is_some_and(|set| set.contains(&to))
    }
}

/// An immutable business event (order, payment, ...) with line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub organization_id: OrganizationId,
    pub transaction_type: String,
    /// Human-readable number, unique per (organization, type).
    pub transaction_number: String,
    pub transaction_date: i64,
    /// Always computed by the store as the sum of line amounts.
    pub total_amount: f64,
    pub currency: String,
    pub status: TransactionStatus,
    pub metadata: Option<serde_json::Value>,
    pub created_at: i64,
}

/// A persisted transaction line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    pub transaction_id: TransactionId,
    /// The entity this line refers to (e.g. a product), if any.
    pub entity_id: Option<EntityId>,
    pub line_description: String,
    pub quantity: f64,
    pub unit_price: f64,
    /// quantity × unit price, computed at insert time.
    pub line_amount: f64,
    /// Zero-based position within the transaction.
    pub line_order: i32,
}

/// Input for one line of a new transaction. The store computes the line
/// amount and ordering index itself.
#[derive(Debug, Clone)]
pub struct NewTransactionLine {
    pub entity_id: Option<EntityId>,
    pub line_description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl NewTransactionLine {
    /// A line without an entity reference.
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            entity_id: None,
            line_description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// Attaches an entity reference to this line.
    #[must_use]
    pub fn with_entity(mut self, entity_id: EntityId) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// quantity × unit price.
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}
