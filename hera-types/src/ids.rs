//! Identifier types used throughout the HERA data core.
//!
//! Uses UUID v7 for time-ordered, globally unique identifiers. Every id kind
//! gets its own newtype so an entity id can never be passed where a
//! transaction id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new identifier with the current timestamp.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parses an identifier from a string.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(
    /// Unique identifier for an organization (tenant).
    /// Every store operation is scoped by one of these; there is no implicit
    /// "current tenant."
    OrganizationId
);

define_id!(
    /// Unique identifier for an entity (product, customer, staff, ...).
    /// Uses UUID v7 which embeds a timestamp for natural ordering.
    EntityId
);

define_id!(
    /// Unique identifier for a metadata document version.
    MetadataId
);

define_id!(
    /// Unique identifier for a relationship edge.
    RelationshipId
);

define_id!(
    /// Unique identifier for a business transaction.
    TransactionId
);
