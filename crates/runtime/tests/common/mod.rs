#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use trait_core::{
    BehaviourError, BehaviourRegistry, Entity, RescheduleMode, TraitBehaviour, TraitDefinition,
    TraitRegistry,
};
use trait_runtime::{LiveEntities, ManualClock, TraitLifecycleManager, TraitScheduler};

pub fn chill() -> TraitDefinition {
    TraitDefinition::new("chill")
        .with_attribute("speed", -0.2)
        .temporary(3, 60)
}

pub fn strong() -> TraitDefinition {
    TraitDefinition::new("strong").with_attribute("strength", 2.0)
}

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub registry: Arc<TraitRegistry>,
    pub behaviours: Arc<BehaviourRegistry>,
    pub lifecycle: Arc<TraitLifecycleManager>,
    pub scheduler: TraitScheduler,
}

impl Harness {
    pub fn new(definitions: Vec<TraitDefinition>) -> Self {
        let clock = Arc::new(ManualClock::new(0));
        let registry = Arc::new(TraitRegistry::from_definitions(definitions).unwrap());
        let behaviours = Arc::new(BehaviourRegistry::new());
        let lifecycle = Arc::new(TraitLifecycleManager::new(
            Arc::clone(&registry),
            clock.clone(),
        ));
        let scheduler = TraitScheduler::new(
            Arc::clone(&lifecycle),
            Arc::clone(&behaviours),
            Arc::new(LiveEntities::new()),
            RescheduleMode::FromNow,
        );
        Self {
            clock,
            registry,
            behaviours,
            lifecycle,
            scheduler,
        }
    }
}

/// Records `(entity, value)` for every invocation.
pub struct Recorder {
    property: &'static str,
    calls: Mutex<Vec<(String, f32)>>,
}

impl Recorder {
    pub fn new(property: &'static str) -> Arc<Self> {
        Arc::new(Self {
            property,
            calls: Mutex::new(Vec::new()),
        })
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

/// Fails for one entity id and succeeds for everybody else.
pub struct FailFor {
    pub property: &'static str,
    pub entity: &'static str,
}

impl TraitBehaviour for FailFor {
    fn property_name(&self) -> &str {
        self.property
    }

    fn process(&self, entity: &dyn Entity, _value: f32) -> Result<(), BehaviourError> {
        if entity.id().as_str() == self.entity {
            Err(BehaviourError::new("handler failed"))
        } else {
            Ok(())
        }
    }
}
