//! Registry of entities the scheduler ticks.
//!
//! Populated by the host's join/leave signal. The scheduler iterates a
//! snapshot, so joins and leaves during a tick take effect on the next one.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use trait_core::{Entity, EntityId};

#[derive(Default)]
pub struct LiveEntities {
    entities: RwLock<HashMap<EntityId, Arc<dyn Entity>>>,
}

impl LiveEntities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ticking `entity`. A second join with the same id replaces the
    /// previous handle and returns `false`.
    pub fn join(&self, entity: Arc<dyn Entity>) -> bool {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(entity.id().clone(), entity)
            .is_none()
    }

    /// Stops ticking the entity. Leaving an unknown id is a no-op.
    pub fn leave(&self, id: &EntityId) -> Option<Arc<dyn Entity>> {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn get(&self, id: &EntityId) -> Option<Arc<dyn Entity>> {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Current entities ordered by id.
    pub fn snapshot(&self) -> Vec<Arc<dyn Entity>> {
        let mut entities: Vec<Arc<dyn Entity>> = self
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        entities.sort_by(|a, b| a.id().cmp(b.id()));
        entities
    }

    pub fn len(&self) -> usize {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
