//! Trait lifecycle notifications for observers.
//!
//! Publishing is best-effort: an event with no subscribers is dropped, and a
//! slow subscriber that falls behind the buffer sees `Lagged` on its receiver.
//! Nothing in the trait system waits on observers.

use serde::Serialize;
use tokio::sync::broadcast;

use trait_core::EntityId;

/// A change to an entity's trait set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraitEvent {
    /// The trait became active.
    Applied { entity: EntityId, code: String },
    /// The trait was removed on request.
    Removed { entity: EntityId, code: String },
    /// One firing was committed; `remaining` firings are left.
    Fired {
        entity: EntityId,
        code: String,
        remaining: i32,
    },
    /// Last firing done and the trait removed.
    Expired { entity: EntityId, code: String },
    /// The entity lists a code the registry does not define.
    StaleReference { entity: EntityId, code: String },
}

impl TraitEvent {
    pub fn entity(&self) -> &EntityId {
        match self {
            Self::Applied { entity, .. }
            | Self::Removed { entity, .. }
            | Self::Fired { entity, .. }
            | Self::Expired { entity, .. }
            | Self::StaleReference { entity, .. } => entity,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Applied { code, .. }
            | Self::Removed { code, .. }
            | Self::Fired { code, .. }
            | Self::Expired { code, .. }
            | Self::StaleReference { code, .. } => code,
        }
    }
}

/// Broadcast channel of [`TraitEvent`]s.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TraitEvent>,
}

impl EventBus {
    /// Creates a bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: TraitEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("No subscribers for trait events");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TraitEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
