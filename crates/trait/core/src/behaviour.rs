//! Behaviours reacting to trait firings.
//!
//! Definitions only say *which* stat a trait touches and by how much. What a
//! firing actually does (damage over time, regeneration, a sound cue) lives in
//! [`TraitBehaviour`] implementations registered per stat-property name.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::entity::Entity;

/// Failure reported by a behaviour handler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BehaviourError {
    pub message: String,
}

impl BehaviourError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Handler invoked on every firing of a trait that carries its property.
pub trait TraitBehaviour: Send + Sync {
    /// Stat-property name this handler subscribes to.
    fn property_name(&self) -> &str;

    fn process(&self, entity: &dyn Entity, value: f32) -> Result<(), BehaviourError>;
}

/// Property name to handlers, in registration order.
///
/// Registration is not deduplicated: registering the same handler twice makes
/// it run twice per firing.
#[derive(Default)]
pub struct BehaviourRegistry {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn TraitBehaviour>>>>,
}

impl BehaviourRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: Arc<dyn TraitBehaviour>) {
        let property = handler.property_name().to_string();
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(property)
            .or_default()
            .push(handler);
    }

    /// Snapshot of the handlers for `property`; empty when nobody listens.
    pub fn handlers_for(&self, property: &str) -> Vec<Arc<dyn TraitBehaviour>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl TraitBehaviour for Named {
        fn property_name(&self) -> &str {
            self.0
        }

        fn process(&self, _entity: &dyn Entity, _value: f32) -> Result<(), BehaviourError> {
            Ok(())
        }
    }

    #[test]
    fn groups_handlers_by_property() {
        let registry = BehaviourRegistry::new();
        registry.register(Arc::new(Named("speed")));
        registry.register(Arc::new(Named("health")));
        registry.register(Arc::new(Named("speed")));

        let handlers = registry.handlers_for("speed");
        assert_eq!(handlers.len(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn unknown_property_has_no_handlers() {
        let registry = BehaviourRegistry::new();
        assert!(registry.handlers_for("speed").is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn double_registration_is_kept() {
        let registry = BehaviourRegistry::new();
        let handler: Arc<dyn TraitBehaviour> = Arc::new(Named("speed"));
        registry.register(Arc::clone(&handler));
        registry.register(handler);
        assert_eq!(registry.handlers_for("speed").len(), 2);
    }
}
