//! In-crate doubles for the collaborator traits.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::behaviour::{BehaviourError, TraitBehaviour};
use crate::entity::{Entity, EntityId};
use crate::stats::{StatLedger, StatModifier};
use crate::store::{AttributeStore, AttributeValue, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, AttributeValue>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryStore {
    /// Makes every later `set` and `remove` of `key` fail with an I/O error.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    fn check_writable(&self, key: &str) -> Result<(), StoreError> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(StoreError::Io(std::io::Error::other(format!(
                "write to `{key}` refused"
            ))));
        }
        Ok(())
    }
}

impl AttributeStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<AttributeValue>, StoreError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: AttributeValue) -> Result<(), StoreError> {
        self.check_writable(key)?;
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable(key)?;
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub struct Ledger {
    modifiers: Mutex<HashMap<(String, String), StatModifier>>,
}

impl Ledger {
    pub fn modifier(&self, stat: &str, source: &str) -> Option<StatModifier> {
        self.modifiers
            .lock()
            .unwrap()
            .get(&(stat.to_string(), source.to_string()))
            .copied()
    }
}

impl StatLedger for Ledger {
    fn set(&self, stat: &str, source: &str, modifier: StatModifier) {
        self.modifiers
            .lock()
            .unwrap()
            .insert((stat.to_string(), source.to_string()), modifier);
    }

    fn remove(&self, stat: &str, source: &str) {
        self.modifiers
            .lock()
            .unwrap()
            .remove(&(stat.to_string(), source.to_string()));
    }
}

pub struct TestEntity {
    pub id: EntityId,
    pub store: Arc<MemoryStore>,
    pub ledger: Ledger,
}

impl TestEntity {
    pub fn new(id: &str) -> Self {
        Self::with_store(id, Arc::default())
    }

    /// Fresh ledger over an existing store, as after a restart.
    pub fn with_store(id: &str, store: Arc<MemoryStore>) -> Self {
        Self {
            id: EntityId::new(id),
            store,
            ledger: Ledger::default(),
        }
    }
}

impl Entity for TestEntity {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn attributes(&self) -> &dyn AttributeStore {
        self.store.as_ref()
    }

    fn stats(&self) -> &dyn StatLedger {
        &self.ledger
    }
}

/// Records every `(entity, value)` it is invoked with.
pub struct Recorder {
    property: &'static str,
    calls: Mutex<Vec<(String, f32)>>,
}

impl Recorder {
    pub fn new(property: &'static str) -> Self {
        Self {
            property,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl TraitBehaviour for Recorder {
    fn property_name(&self) -> &str {
        self.property
    }

    fn process(&self, entity: &dyn Entity, value: f32) -> Result<(), BehaviourError> {
        self.calls
            .lock()
            .unwrap()
            .push((entity.id().to_string(), value));
        Ok(())
    }
}
