//! Timed, repeatable stat-modifying traits attached to live entities.
//!
//! `trait-core` defines the data model (definitions, registries, persisted
//! per-entity state) and the collaborator contracts the rest of the workspace
//! plugs into. It performs no I/O and owns no threads: persistence goes through
//! [`AttributeStore`], stat bookkeeping through [`StatLedger`] and time through
//! [`WorldClock`].
//!
//! Lifecycle primitives in [`ops`] mutate a single entity without any
//! synchronization; callers that share entities across threads (see the
//! `trait-runtime` crate) serialize access per entity before calling them.
pub mod behaviour;
pub mod clock;
pub mod config;
pub mod definition;
pub mod entity;
pub mod error;
pub mod ops;
pub mod registry;
pub mod state;
pub mod stats;
pub mod store;

pub use behaviour::{BehaviourError, BehaviourRegistry, TraitBehaviour};
pub use clock::WorldClock;
pub use config::{RescheduleMode, SchedulerConfig};
pub use definition::{CharacterClass, CombineMode, TraitDefinition, TraitRef};
pub use entity::{Entity, EntityId};
pub use error::{ErrorSeverity, Result, TraitError};
pub use ops::{Firing, FiringOutcome, FiringPlan};
pub use registry::{ClassRegistry, TraitRegistry};
pub use state::{EntityTraitState, TraitStateSnapshot, TraitTimer, keys};
pub use stats::{StatLedger, StatModifier, source_tag};
pub use store::{AttributeStore, AttributeValue, StoreError};

#[cfg(test)]
mod testing;
