//! Runtime orchestration for the trait system.
//!
//! This crate wires the pure lifecycle primitives of `trait-core` into a
//! concurrent service: per-entity locking, a live-entity registry, the
//! periodic scheduler and its tokio worker, attribute-store adapters, and the
//! [`TraitSystem`] façade hosts embed.
//!
//! Modules are organized by responsibility:
//! - [`system`] hosts the façade and builder
//! - [`lifecycle`] and [`scheduler`] implement apply/remove and the tick pass
//! - [`api`] exposes error and configuration types
//! - [`events`] publishes trait lifecycle notifications
//! - [`repository`] provides attribute-store implementations
//! - [`entity`], [`stats`] and [`clock`] provide ready-made collaborators
//! - `workers` keeps the background tick task internal to the crate
pub mod api;
pub mod clock;
pub mod entity;
pub mod events;
pub mod lifecycle;
pub mod live;
pub mod locks;
pub mod repository;
pub mod scheduler;
pub mod stats;
pub mod system;

mod workers;

pub use api::{Result, RuntimeConfig, RuntimeError};
pub use clock::{ManualClock, SystemClock};
pub use entity::EntityHandle;
pub use events::{EventBus, TraitEvent};
pub use lifecycle::TraitLifecycleManager;
pub use live::LiveEntities;
pub use locks::EntityLocks;
pub use repository::{FileAttributeStore, InMemoryAttributeStore};
pub use scheduler::{TickReport, TraitScheduler};
pub use stats::StatSheet;
pub use system::{TraitSystem, TraitSystemBuilder};
