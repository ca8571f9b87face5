//! Entities that can carry traits.

use std::fmt;

use crate::stats::StatLedger;
use crate::store::AttributeStore;

/// Stable identity of a tracked entity (e.g. a player UID).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An entity as seen by the trait system.
///
/// The system never owns the entity; it only reads and writes the namespaced
/// slice of its persisted attributes and its tagged stat modifiers.
pub trait Entity: Send + Sync {
    fn id(&self) -> &EntityId;

    fn attributes(&self) -> &dyn AttributeStore;

    fn stats(&self) -> &dyn StatLedger;
}
