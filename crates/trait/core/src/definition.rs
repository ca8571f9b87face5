//! Trait and character-class definitions decoded from content assets.

use std::collections::BTreeMap;

use crate::error::{Result, TraitError};

/// How a trait's modifiers combine with other modifiers on the same stat.
///
/// Assets carry this as the boolean `mul` flag: `false` is additive, `true`
/// is multiplicative. A multiplicative value `v` scales the stat by `1 + v`
/// after all additive deltas are summed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "bool", into = "bool")
)]
pub enum CombineMode {
    #[default]
    Additive,
    Multiplicative,
}

impl From<bool> for CombineMode {
    fn from(multiplicative: bool) -> Self {
        if multiplicative {
            Self::Multiplicative
        } else {
            Self::Additive
        }
    }
}

impl From<CombineMode> for bool {
    fn from(mode: CombineMode) -> Self {
        matches!(mode, CombineMode::Multiplicative)
    }
}

/// Immutable definition of a trait, identified by its unique `code`.
///
/// Wire names follow the shipped asset format (`repeat`, `duration`, `temp`,
/// `mul`); the long-form names are accepted as aliases.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraitDefinition {
    pub code: String,

    /// Stat-property name to delta.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: BTreeMap<String, f32>,

    /// Number of firings over the life of a temporary trait.
    #[cfg_attr(feature = "serde", serde(default, rename = "repeat", alias = "repeatCount"))]
    pub repeat_count: i32,

    /// World-clock seconds between firings.
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "duration", alias = "durationSeconds")
    )]
    pub duration_seconds: i64,

    #[cfg_attr(feature = "serde", serde(default, rename = "temp", alias = "temporary"))]
    pub temporary: bool,

    #[cfg_attr(feature = "serde", serde(default, rename = "mul", alias = "combineMode"))]
    pub combine_mode: CombineMode,
}

impl TraitDefinition {
    /// Creates a permanent trait with no attributes.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Adds a stat delta (builder pattern).
    #[must_use]
    pub fn with_attribute(mut self, stat: impl Into<String>, value: f32) -> Self {
        self.attributes.insert(stat.into(), value);
        self
    }

    /// Marks the trait temporary with the given firing schedule (builder pattern).
    #[must_use]
    pub fn temporary(mut self, repeat_count: i32, duration_seconds: i64) -> Self {
        self.temporary = true;
        self.repeat_count = repeat_count;
        self.duration_seconds = duration_seconds;
        self
    }

    #[must_use]
    pub fn with_combine_mode(mut self, mode: CombineMode) -> Self {
        self.combine_mode = mode;
        self
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Rejects configurations the scheduler cannot honour.
    ///
    /// Permanent traits never read their schedule fields, so only temporary
    /// traits are checked.
    pub fn validate(&self) -> Result<()> {
        if self.code.is_empty() {
            return Err(TraitError::InvalidDefinition {
                code: self.code.clone(),
                reason: "code must not be empty",
            });
        }
        if !self.temporary {
            return Ok(());
        }
        if self.repeat_count < 1 {
            return Err(TraitError::InvalidDefinition {
                code: self.code.clone(),
                reason: "temporary trait needs a repeat count of at least 1",
            });
        }
        if self.duration_seconds < 0 {
            return Err(TraitError::InvalidDefinition {
                code: self.code.clone(),
                reason: "temporary trait needs a non-negative duration",
            });
        }
        Ok(())
    }
}

/// Character class shipped alongside trait definitions.
///
/// Opaque to this crate: it is stored and looked up, never interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterClass {
    pub code: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: Vec<String>,

    #[cfg_attr(feature = "serde", serde(default = "enabled_by_default"))]
    pub enabled: bool,
}

#[cfg(feature = "serde")]
fn enabled_by_default() -> bool {
    true
}

/// A trait named either by code or by definition.
///
/// Both forms are resolved against the registry, so a definition that was
/// never loaded is rejected the same way an unknown code is.
#[derive(Clone, Copy, Debug)]
pub enum TraitRef<'a> {
    Code(&'a str),
    Definition(&'a TraitDefinition),
}

impl<'a> TraitRef<'a> {
    pub fn code(&self) -> &'a str {
        match self {
            Self::Code(code) => code,
            Self::Definition(definition) => &definition.code,
        }
    }
}

impl<'a> From<&'a str> for TraitRef<'a> {
    fn from(code: &'a str) -> Self {
        Self::Code(code)
    }
}

impl<'a> From<&'a String> for TraitRef<'a> {
    fn from(code: &'a String) -> Self {
        Self::Code(code.as_str())
    }
}

impl<'a> From<&'a TraitDefinition> for TraitRef<'a> {
    fn from(definition: &'a TraitDefinition) -> Self {
        Self::Definition(definition)
    }
}
