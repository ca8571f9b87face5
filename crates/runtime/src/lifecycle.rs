//! Apply, remove and query traits on live entities.
//!
//! [`TraitLifecycleManager`] resolves codes against the registry, takes the
//! entity's lock and runs the matching primitive from [`trait_core::ops`].
//! Callers get lifecycle failures back immediately.

use std::sync::Arc;

use tracing::{debug, warn};
use trait_core::{
    Entity, EntityId, EntityTraitState, TraitRef, TraitRegistry, TraitStateSnapshot, WorldClock,
    ops,
};

use crate::api::Result;
use crate::events::{EventBus, TraitEvent};
use crate::locks::EntityLocks;

pub struct TraitLifecycleManager {
    registry: Arc<TraitRegistry>,
    clock: Arc<dyn WorldClock>,
    locks: EntityLocks,
    events: EventBus,
}

impl TraitLifecycleManager {
    pub fn new(registry: Arc<TraitRegistry>, clock: Arc<dyn WorldClock>) -> Self {
        Self::with_events(registry, clock, EventBus::new())
    }

    pub fn with_events(
        registry: Arc<TraitRegistry>,
        clock: Arc<dyn WorldClock>,
        events: EventBus,
    ) -> Self {
        Self {
            registry,
            clock,
            locks: EntityLocks::new(),
            events,
        }
    }

    /// Activates a trait on `entity`.
    ///
    /// Returns `false` if it was already active. An unknown code fails with
    /// [`TraitError::UnknownTrait`](trait_core::TraitError::UnknownTrait) and
    /// leaves the entity untouched.
    pub fn apply_trait<'a>(
        &self,
        entity: &dyn Entity,
        trait_ref: impl Into<TraitRef<'a>>,
    ) -> Result<bool> {
        let trait_ref: TraitRef<'a> = trait_ref.into();
        let definition = self.registry.lookup(trait_ref.code())?;
        let now = self.now();

        let applied = self.locked(entity.id(), || ops::apply(entity, &definition, now))??;
        if applied {
            debug!(entity = %entity.id(), code = %definition.code, now, "trait applied");
            self.events.publish(TraitEvent::Applied {
                entity: entity.id().clone(),
                code: definition.code.clone(),
            });
        }
        Ok(applied)
    }

    /// Removes a trait with all its modifiers and timer state.
    ///
    /// Returns `false` if it was not active. Unknown codes fail like
    /// [`apply_trait`](Self::apply_trait).
    pub fn remove_trait<'a>(
        &self,
        entity: &dyn Entity,
        trait_ref: impl Into<TraitRef<'a>>,
    ) -> Result<bool> {
        let trait_ref: TraitRef<'a> = trait_ref.into();
        let definition = self.registry.lookup(trait_ref.code())?;

        let removed = self.locked(entity.id(), || ops::remove(entity, &definition))??;
        if removed {
            debug!(entity = %entity.id(), code = %definition.code, "trait removed");
            self.events.publish(TraitEvent::Removed {
                entity: entity.id().clone(),
                code: definition.code.clone(),
            });
        }
        Ok(removed)
    }

    /// Membership check against the persisted active set. Codes the registry
    /// does not know simply read as absent.
    pub fn has_trait(&self, entity: &dyn Entity, code: &str) -> Result<bool> {
        Ok(EntityTraitState::of(entity).is_active(code)?)
    }

    pub fn state_snapshot(&self, entity: &dyn Entity) -> Result<TraitStateSnapshot> {
        Ok(self.locked(entity.id(), || EntityTraitState::of(entity).snapshot())??)
    }

    /// Re-records the stat modifiers of every active trait.
    ///
    /// For entities whose stat ledger starts empty after a restart while the
    /// attribute store still lists active traits. Stale codes are skipped.
    /// Returns how many traits were restored.
    pub fn restore_modifiers(&self, entity: &dyn Entity) -> Result<usize> {
        self.locked(entity.id(), || -> Result<usize> {
            let mut restored = 0;
            for code in EntityTraitState::of(entity).active_codes()? {
                let Ok(definition) = self.registry.lookup(&code) else {
                    warn!(entity = %entity.id(), %code, "active trait is not registered; modifiers not restored");
                    continue;
                };
                if ops::restore(entity, &definition)? {
                    restored += 1;
                }
            }
            Ok(restored)
        })?
    }

    pub fn registry(&self) -> &Arc<TraitRegistry> {
        &self.registry
    }

    /// Current world time.
    pub fn now(&self) -> i64 {
        self.clock.elapsed_seconds()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Forgets the lock of an entity that left.
    pub fn release_entity(&self, id: &EntityId) {
        self.locks.release(id);
    }

    pub(crate) fn locked<R>(&self, id: &EntityId, f: impl FnOnce() -> R) -> Result<R> {
        self.locks.with(id, f)
    }
}
