//! In-memory stat ledger.
//!
//! Effective value of a stat:
//!
//! ```text
//! (base + Σ additive) × Π (1 + multiplicative)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use trait_core::{CombineMode, StatLedger, StatModifier};

#[derive(Default)]
struct Sheet {
    base: HashMap<String, f32>,
    modifiers: HashMap<String, BTreeMap<String, StatModifier>>,
}

/// Base values plus tagged modifiers per stat.
#[derive(Default)]
pub struct StatSheet {
    sheet: RwLock<Sheet>,
}

impl StatSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_base(&self, stat: &str, value: f32) {
        self.sheet
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .base
            .insert(stat.to_string(), value);
    }

    /// Base value, `0.0` for stats never set.
    pub fn base(&self, stat: &str) -> f32 {
        self.sheet
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .base
            .get(stat)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn effective(&self, stat: &str) -> f32 {
        let sheet = self.sheet.read().unwrap_or_else(PoisonError::into_inner);
        let base = sheet.base.get(stat).copied().unwrap_or(0.0);
        let Some(modifiers) = sheet.modifiers.get(stat) else {
            return base;
        };

        let (additive, multiplier) =
            modifiers
                .values()
                .fold((0.0_f32, 1.0_f32), |(add, mul), modifier| match modifier.mode {
                    CombineMode::Additive => (add + modifier.value, mul),
                    CombineMode::Multiplicative => (add, mul * (1.0 + modifier.value)),
                });

        (base + additive) * multiplier
    }

    pub fn modifier(&self, stat: &str, source: &str) -> Option<StatModifier> {
        self.sheet
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .modifiers
            .get(stat)
            .and_then(|modifiers| modifiers.get(source))
            .copied()
    }

    /// Sources with a modifier on `stat`, sorted.
    pub fn sources(&self, stat: &str) -> Vec<String> {
        self.sheet
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .modifiers
            .get(stat)
            .map(|modifiers| modifiers.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl StatLedger for StatSheet {
    fn set(&self, stat: &str, source: &str, modifier: StatModifier) {
        self.sheet
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .modifiers
            .entry(stat.to_string())
            .or_default()
            .insert(source.to_string(), modifier);
    }

    fn remove(&self, stat: &str, source: &str) {
        let mut sheet = self.sheet.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(modifiers) = sheet.modifiers.get_mut(stat) {
            modifiers.remove(source);
            if modifiers.is_empty() {
                sheet.modifiers.remove(stat);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_then_multiplicative() {
        let sheet = StatSheet::new();
        sheet.set_base("walkspeed", 1.0);
        sheet.set("walkspeed", "trait-strongback", StatModifier::additive(0.5));
        sheet.set(
            "walkspeed",
            "trait-nimble",
            StatModifier::new(1.0, CombineMode::Multiplicative),
        );

        assert_eq!(sheet.effective("walkspeed"), 3.0);
    }

    #[test]
    fn removing_one_source_keeps_others() {
        let sheet = StatSheet::new();
        sheet.set("speed", "trait-chill", StatModifier::additive(-0.25));
        sheet.set("speed", "boots", StatModifier::additive(0.5));

        sheet.remove("speed", "trait-chill");

        assert_eq!(sheet.sources("speed"), vec!["boots".to_string()]);
        assert_eq!(sheet.effective("speed"), 0.5);
    }

    #[test]
    fn setting_same_source_replaces() {
        let sheet = StatSheet::new();
        sheet.set("speed", "trait-chill", StatModifier::additive(-0.25));
        sheet.set("speed", "trait-chill", StatModifier::additive(-0.5));
        assert_eq!(sheet.effective("speed"), -0.5);
    }

    #[test]
    fn untouched_stat_reads_base() {
        let sheet = StatSheet::new();
        sheet.set_base("health", 20.0);
        assert_eq!(sheet.effective("health"), 20.0);
        assert_eq!(sheet.base("mana"), 0.0);
    }
}
