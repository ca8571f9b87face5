//! Per-entity trait state, read from and written to the attribute store.
//!
//! # Persisted Layout
//!
//! ```text
//! traits                 string array   active trait codes
//! trait-<code>-repeat    int            remaining firings (temporary only)
//! trait-<code>-fireat    long           next fire time    (temporary only)
//! ```
//!
//! [`EntityTraitState`] holds no data of its own. Every call goes to the
//! store, which makes the view valid immediately after a restart.

use std::collections::BTreeMap;

use crate::entity::Entity;
use crate::store::{AttributeStore, StoreError};

/// Attribute keys used by the trait system.
pub mod keys {
    use crate::stats::source_tag;

    /// Key of the string array listing active trait codes.
    pub const ACTIVE_TRAITS: &str = "traits";

    const REPEAT_SUFFIX: &str = "-repeat";
    const FIRE_AT_SUFFIX: &str = "-fireat";

    pub fn repeat(code: &str) -> String {
        format!("{}{REPEAT_SUFFIX}", source_tag(code))
    }

    pub fn fire_at(code: &str) -> String {
        format!("{}{FIRE_AT_SUFFIX}", source_tag(code))
    }
}

/// Timer fields of an active temporary trait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitTimer {
    pub remaining_repeats: i32,
    pub next_fire_at: i64,
}

impl TraitTimer {
    pub const fn new(remaining_repeats: i32, next_fire_at: i64) -> Self {
        Self {
            remaining_repeats,
            next_fire_at,
        }
    }

    pub const fn is_due(&self, now: i64) -> bool {
        now >= self.next_fire_at
    }
}

/// Everything the store holds about an entity's traits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitStateSnapshot {
    pub active_codes: Vec<String>,
    pub timers: BTreeMap<String, TraitTimer>,
}

/// View over an entity's persisted trait attributes.
#[derive(Clone, Copy)]
pub struct EntityTraitState<'a> {
    store: &'a dyn AttributeStore,
}

impl<'a> EntityTraitState<'a> {
    pub fn new(store: &'a dyn AttributeStore) -> Self {
        Self { store }
    }

    pub fn of(entity: &'a dyn Entity) -> Self {
        Self::new(entity.attributes())
    }

    /// Active codes in activation order, without duplicates.
    pub fn active_codes(&self) -> Result<Vec<String>, StoreError> {
        let mut codes = self
            .store
            .get_string_array(keys::ACTIVE_TRAITS)?
            .unwrap_or_default();
        let mut seen = std::collections::HashSet::new();
        codes.retain(|code| seen.insert(code.clone()));
        Ok(codes)
    }

    pub fn is_active(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.active_codes()?.iter().any(|active| active == code))
    }

    /// Adds `code` to the active set. Returns `false` if it was already there.
    pub fn activate(&self, code: &str) -> Result<bool, StoreError> {
        let mut codes = self.active_codes()?;
        if codes.iter().any(|active| active == code) {
            return Ok(false);
        }
        codes.push(code.to_string());
        self.store.set_string_array(keys::ACTIVE_TRAITS, codes)?;
        Ok(true)
    }

    /// Removes `code` and its timer fields. Returns `false` if it was not active.
    pub fn deactivate(&self, code: &str) -> Result<bool, StoreError> {
        if !self.retire(code)? {
            return Ok(false);
        }
        self.clear_timer(code)?;
        Ok(true)
    }

    /// Drops `code` from the active set, leaving its timer fields behind.
    ///
    /// Timer fields of an inactive code are never read, so a failure between
    /// this and [`clear_timer`](Self::clear_timer) leaves the trait removed.
    pub fn retire(&self, code: &str) -> Result<bool, StoreError> {
        let mut codes = self.active_codes()?;
        let before = codes.len();
        codes.retain(|active| active != code);
        if codes.len() == before {
            return Ok(false);
        }
        self.store.set_string_array(keys::ACTIVE_TRAITS, codes)?;
        Ok(true)
    }

    pub fn set_timer(&self, code: &str, timer: TraitTimer) -> Result<(), StoreError> {
        self.store
            .set_int(&keys::repeat(code), timer.remaining_repeats)?;
        self.store.set_long(&keys::fire_at(code), timer.next_fire_at)
    }

    /// Timer fields for `code`, or `None` unless both are present.
    pub fn timer(&self, code: &str) -> Result<Option<TraitTimer>, StoreError> {
        let repeat = self.store.get_int(&keys::repeat(code))?;
        let fire_at = self.store.get_long(&keys::fire_at(code))?;
        Ok(repeat
            .zip(fire_at)
            .map(|(remaining, next)| TraitTimer::new(remaining, next)))
    }

    pub fn clear_timer(&self, code: &str) -> Result<(), StoreError> {
        self.store.remove(&keys::repeat(code))?;
        self.store.remove(&keys::fire_at(code))
    }

    pub fn snapshot(&self) -> Result<TraitStateSnapshot, StoreError> {
        let active_codes = self.active_codes()?;
        let mut timers = BTreeMap::new();
        for code in &active_codes {
            if let Some(timer) = self.timer(code)? {
                timers.insert(code.clone(), timer);
            }
        }
        Ok(TraitStateSnapshot {
            active_codes,
            timers,
        })
    }
}
