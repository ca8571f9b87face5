//! In-memory AttributeStore implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use trait_core::{AttributeStore, AttributeValue, StoreError};

/// Attribute bag kept in process memory.
#[derive(Default)]
pub struct InMemoryAttributeStore {
    values: RwLock<BTreeMap<String, AttributeValue>>,
}

impl InMemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing values, e.g. a save loaded by the host.
    pub fn from_values(values: BTreeMap<String, AttributeValue>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    /// Copy of every attribute currently held.
    pub fn export(&self) -> Result<BTreeMap<String, AttributeValue>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.clone())
    }
}

impl AttributeStore for InMemoryAttributeStore {
    fn get(&self, key: &str) -> Result<Option<AttributeValue>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: AttributeValue) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }
}
