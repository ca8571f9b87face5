//! Ready-made [`Entity`] implementation.

use std::sync::Arc;

use trait_core::{AttributeStore, Entity, EntityId, StatLedger};

use crate::repository::InMemoryAttributeStore;
use crate::stats::StatSheet;

/// An entity backed by a shared attribute store and an in-memory stat sheet.
///
/// The stat sheet is not persisted; after a restart, modifiers of traits that
/// are still active are rebuilt by
/// [`TraitLifecycleManager::restore_modifiers`](crate::TraitLifecycleManager::restore_modifiers).
pub struct EntityHandle {
    id: EntityId,
    attributes: Arc<dyn AttributeStore>,
    stats: StatSheet,
}

impl EntityHandle {
    pub fn new(id: impl Into<EntityId>, attributes: Arc<dyn AttributeStore>) -> Self {
        Self {
            id: id.into(),
            attributes,
            stats: StatSheet::new(),
        }
    }

    pub fn in_memory(id: impl Into<EntityId>) -> Self {
        Self::new(id, Arc::new(InMemoryAttributeStore::new()))
    }

    pub fn stat_sheet(&self) -> &StatSheet {
        &self.stats
    }

    pub fn attribute_store(&self) -> &Arc<dyn AttributeStore> {
        &self.attributes
    }
}

impl Entity for EntityHandle {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn attributes(&self) -> &dyn AttributeStore {
        self.attributes.as_ref()
    }

    fn stats(&self) -> &dyn StatLedger {
        &self.stats
    }
}
