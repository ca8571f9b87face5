//! Load-once lookup tables for trait and character-class definitions.
//!
//! Both registries are read-mostly: lookups take a shared lock and clone an
//! `Arc`, while a reload swaps the whole table at once. A reader therefore sees
//! either the old table or the new one, never a mix.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::definition::{CharacterClass, TraitDefinition};
use crate::error::{Result, TraitError};

type TraitTable = HashMap<String, Arc<TraitDefinition>>;

#[derive(Default)]
pub struct TraitRegistry {
    table: RwLock<Arc<TraitTable>>,
}

impl TraitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from `definitions`, validating every entry.
    pub fn from_definitions(definitions: Vec<TraitDefinition>) -> Result<Self> {
        let registry = Self::new();
        registry.load(definitions)?;
        Ok(registry)
    }

    /// Replaces the entire registry.
    ///
    /// The batch is validated before anything is swapped; on error the
    /// previous table stays in place. Later duplicates of a code win.
    pub fn load(&self, definitions: Vec<TraitDefinition>) -> Result<()> {
        for definition in &definitions {
            definition.validate()?;
        }

        let table: TraitTable = definitions
            .into_iter()
            .map(|definition| (definition.code.clone(), Arc::new(definition)))
            .collect();

        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
        Ok(())
    }

    pub fn lookup(&self, code: &str) -> Result<Arc<TraitDefinition>> {
        self.snapshot()
            .get(code)
            .cloned()
            .ok_or_else(|| TraitError::UnknownTrait(code.to_string()))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.snapshot().contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered codes, sorted.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.snapshot().keys().cloned().collect();
        codes.sort_unstable();
        codes
    }

    fn snapshot(&self) -> Arc<TraitTable> {
        Arc::clone(&self.table.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Character classes by code. Pass-through data only.
#[derive(Default)]
pub struct ClassRegistry {
    table: RwLock<Arc<HashMap<String, Arc<CharacterClass>>>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, classes: Vec<CharacterClass>) {
        let table = classes
            .into_iter()
            .map(|class| (class.code.clone(), Arc::new(class)))
            .collect();
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
    }

    pub fn get(&self, code: &str) -> Option<Arc<CharacterClass>> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(code)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.table.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chill() -> TraitDefinition {
        TraitDefinition::new("chill")
            .with_attribute("speed", -0.2)
            .temporary(3, 60)
    }

    #[test]
    fn lookup_finds_loaded_definition() {
        let registry = TraitRegistry::from_definitions(vec![chill()]).unwrap();
        let definition = registry.lookup("chill").unwrap();
        assert_eq!(definition.repeat_count, 3);
    }

    #[test]
    fn lookup_of_missing_code_fails() {
        let registry = TraitRegistry::new();
        let result = registry.lookup("chill");
        assert!(matches!(result, Err(TraitError::UnknownTrait(code)) if code == "chill"));
    }

    #[test]
    fn reload_replaces_instead_of_merging() {
        let registry = TraitRegistry::from_definitions(vec![chill()]).unwrap();
        registry
            .load(vec![TraitDefinition::new("strong").with_attribute("strength", 1.0)])
            .unwrap();

        assert!(!registry.contains("chill"));
        assert!(registry.contains("strong"));
        assert_eq!(registry.codes(), vec!["strong".to_string()]);
    }

    #[test]
    fn invalid_batch_keeps_previous_table() {
        let registry = TraitRegistry::from_definitions(vec![chill()]).unwrap();
        let result = registry.load(vec![
            TraitDefinition::new("strong"),
            TraitDefinition::new("broken").temporary(0, 10),
        ]);

        assert!(matches!(result, Err(TraitError::InvalidDefinition { .. })));
        assert!(registry.contains("chill"));
        assert!(!registry.contains("strong"));
    }

    #[test]
    fn later_duplicate_wins() {
        let registry = TraitRegistry::from_definitions(vec![
            chill(),
            TraitDefinition::new("chill").temporary(5, 10),
        ])
        .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("chill").unwrap().repeat_count, 5);
    }

    #[test]
    fn class_registry_replaces_on_load() {
        let classes = ClassRegistry::new();
        classes.load(vec![CharacterClass {
            code: "hunter".into(),
            traits: vec!["keen".into()],
            enabled: true,
        }]);
        assert_eq!(classes.get("hunter").unwrap().traits, vec!["keen".to_string()]);

        classes.load(Vec::new());
        assert!(classes.is_empty());
    }
}
