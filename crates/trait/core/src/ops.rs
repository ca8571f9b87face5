//! Lifecycle primitives on a single entity.
//!
//! Nothing here locks. Every function assumes the caller already holds
//! whatever serializes mutation of `entity`, except [`dispatch`], which is
//! meant to run unlocked between [`plan`] and [`commit`].

use std::sync::Arc;

use crate::behaviour::BehaviourRegistry;
use crate::config::RescheduleMode;
use crate::definition::TraitDefinition;
use crate::entity::Entity;
use crate::error::{Result, TraitError};
use crate::state::{EntityTraitState, TraitTimer};
use crate::stats::{StatModifier, source_tag};

/// Activates `definition` on `entity` at world time `now`.
///
/// Returns `false` without touching anything if the trait is already active.
/// The timer is written before the code is marked active and modifiers are
/// recorded last, so a failing store leaves the trait inactive.
pub fn apply(entity: &dyn Entity, definition: &TraitDefinition, now: i64) -> Result<bool> {
    let state = EntityTraitState::of(entity);
    let code = definition.code.as_str();
    if state.is_active(code)? {
        return Ok(false);
    }

    let written = if definition.is_temporary() {
        let timer = TraitTimer::new(
            definition.repeat_count,
            now.saturating_add(definition.duration_seconds),
        );
        state
            .set_timer(code, timer)
            .and_then(|()| state.activate(code))
    } else {
        state.activate(code)
    };
    if let Err(e) = written {
        // Best effort: timer fields of an inactive code are never read.
        let _ = state.clear_timer(code);
        return Err(e.into());
    }

    record_modifiers(entity, definition);
    Ok(true)
}

/// Re-records the stat modifiers of an already active trait.
///
/// Persisted state is left untouched. Used when a ledger that does not
/// survive restarts is attached to an entity whose store still lists the
/// trait. Returns `false` if the trait is not active.
pub fn restore(entity: &dyn Entity, definition: &TraitDefinition) -> Result<bool> {
    if !EntityTraitState::of(entity).is_active(&definition.code)? {
        return Ok(false);
    }
    record_modifiers(entity, definition);
    Ok(true)
}

fn record_modifiers(entity: &dyn Entity, definition: &TraitDefinition) {
    let source = source_tag(&definition.code);
    for (stat, value) in &definition.attributes {
        entity
            .stats()
            .set(stat, &source, StatModifier::new(*value, definition.combine_mode));
    }
}

/// Removes every modifier and all persisted state of `definition`.
///
/// Returns `false` if the trait was not active. Modifiers are only dropped
/// once the code is gone from the active set.
pub fn remove(entity: &dyn Entity, definition: &TraitDefinition) -> Result<bool> {
    let state = EntityTraitState::of(entity);
    if !state.retire(&definition.code)? {
        return Ok(false);
    }

    let source = source_tag(&definition.code);
    for stat in definition.attributes.keys() {
        entity.stats().remove(stat, &source);
    }

    state.clear_timer(&definition.code)?;
    Ok(true)
}

/// A due firing captured under the entity lock.
#[derive(Clone, Debug)]
pub struct Firing {
    pub definition: Arc<TraitDefinition>,
    /// Timer as read when the firing was planned.
    pub timer: TraitTimer,
}

impl Firing {
    pub fn code(&self) -> &str {
        &self.definition.code
    }
}

#[derive(Clone, Debug)]
pub enum FiringPlan {
    /// Permanent, or temporary but not yet due.
    Idle,
    Due(Firing),
    /// Active temporary trait whose timer fields are gone.
    MissingTimer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FiringOutcome {
    Rescheduled(TraitTimer),
    /// Last firing done; the trait was removed.
    Expired,
    /// The trait was removed or re-applied after planning; nothing committed.
    Superseded,
}

/// Decides whether `definition` fires on `entity` at `now`.
pub fn plan(entity: &dyn Entity, definition: &Arc<TraitDefinition>, now: i64) -> Result<FiringPlan> {
    if !definition.is_temporary() {
        return Ok(FiringPlan::Idle);
    }

    let state = EntityTraitState::of(entity);
    match state.timer(&definition.code)? {
        None => Ok(FiringPlan::MissingTimer),
        Some(timer) if timer.is_due(now) => Ok(FiringPlan::Due(Firing {
            definition: Arc::clone(definition),
            timer,
        })),
        Some(_) => Ok(FiringPlan::Idle),
    }
}

/// Runs every registered handler for every attribute of the firing.
///
/// Stops at the first failing handler; later handlers of the same firing do
/// not run.
pub fn dispatch(entity: &dyn Entity, firing: &Firing, behaviours: &BehaviourRegistry) -> Result<()> {
    for (property, value) in &firing.definition.attributes {
        for handler in behaviours.handlers_for(property) {
            handler
                .process(entity, *value)
                .map_err(|source| TraitError::Behaviour {
                    property: property.clone(),
                    source,
                })?;
        }
    }
    Ok(())
}

/// Consumes one repeat of a dispatched firing.
///
/// The firing only counts if the trait is still active with the timer seen
/// at planning time.
pub fn commit(
    entity: &dyn Entity,
    firing: &Firing,
    now: i64,
    reschedule: RescheduleMode,
) -> Result<FiringOutcome> {
    let state = EntityTraitState::of(entity);
    let code = firing.code();
    if !state.is_active(code)? || state.timer(code)? != Some(firing.timer) {
        return Ok(FiringOutcome::Superseded);
    }

    let remaining = firing.timer.remaining_repeats - 1;
    if remaining <= 0 {
        remove(entity, &firing.definition)?;
        return Ok(FiringOutcome::Expired);
    }

    let next_fire_at = reschedule.next_fire_at(
        firing.timer.next_fire_at,
        now,
        firing.definition.duration_seconds,
    );
    let timer = TraitTimer::new(remaining, next_fire_at);
    state.set_timer(code, timer)?;
    Ok(FiringOutcome::Rescheduled(timer))
}
