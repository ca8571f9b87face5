//! Stat ledger contract used to apply trait modifiers.

use crate::definition::CombineMode;

const SOURCE_TAG_PREFIX: &str = "trait-";

/// Source tag under which a trait records its stat modifiers.
///
/// The tag is also the prefix of the trait's persisted timer keys.
pub fn source_tag(code: &str) -> String {
    format!("{SOURCE_TAG_PREFIX}{code}")
}

/// One tagged modifier on a stat.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub value: f32,
    pub mode: CombineMode,
}

impl StatModifier {
    pub const fn new(value: f32, mode: CombineMode) -> Self {
        Self { value, mode }
    }

    pub const fn additive(value: f32) -> Self {
        Self::new(value, CombineMode::Additive)
    }
}

/// Per-entity stat bookkeeping.
///
/// Modifiers are keyed by `(stat, source)`: setting the same pair again
/// replaces the previous modifier, and removing one pair leaves every other
/// source on that stat untouched.
pub trait StatLedger: Send + Sync {
    fn set(&self, stat: &str, source: &str, modifier: StatModifier);

    fn remove(&self, stat: &str, source: &str);
}
