//! Per-entity mutual exclusion.
//!
//! The active-trait set and the timer fields of one entity change together.
//! Every apply, remove and scheduler commit for an entity runs inside
//! [`EntityLocks::with`], so those changes never interleave. Different
//! entities use different mutexes and proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use trait_core::EntityId;

use crate::api::{Result, RuntimeError};

#[derive(Default)]
pub struct EntityLocks {
    locks: Mutex<HashMap<EntityId, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock of entity `id`.
    ///
    /// Not reentrant: `f` must not call back into `with` for the same entity.
    pub fn with<R>(&self, id: &EntityId, f: impl FnOnce() -> R) -> Result<R> {
        let lock = {
            let mut locks = self.locks.lock().map_err(|_| RuntimeError::LockPoisoned)?;
            Arc::clone(locks.entry(id.clone()).or_default())
        };
        let _guard = lock.lock().map_err(|_| RuntimeError::LockPoisoned)?;
        Ok(f())
    }

    /// Drops the lock of `id` if nobody is holding or waiting on it.
    pub fn release(&self, id: &EntityId) {
        if let Ok(mut locks) = self.locks.lock()
            && locks
                .get(id)
                .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
