//! Behaviours installed by the CLI: every firing is logged.

use trait_core::{BehaviourError, Entity, TraitBehaviour};

pub struct LogFiring {
    property: String,
}

impl LogFiring {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

impl TraitBehaviour for LogFiring {
    fn property_name(&self) -> &str {
        &self.property
    }

    fn process(&self, entity: &dyn Entity, value: f32) -> Result<(), BehaviourError> {
        tracing::info!(entity = %entity.id(), property = %self.property, value, "trait fired");
        Ok(())
    }
}
