//! Trait system façade.
//!
//! [`TraitSystem`] owns the registries, the lifecycle manager, the scheduler
//! and the background tick worker, and exposes the operations a host calls
//! from its own event handlers. Build one with [`TraitSystem::builder`].

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use trait_core::{
    BehaviourRegistry, CharacterClass, ClassRegistry, Entity, EntityId, TraitBehaviour,
    TraitDefinition, TraitRef, TraitRegistry, WorldClock,
};

use crate::api::{Result, RuntimeConfig, RuntimeError};
use crate::clock::SystemClock;
use crate::events::{EventBus, TraitEvent};
use crate::lifecycle::TraitLifecycleManager;
use crate::live::LiveEntities;
use crate::scheduler::{TickReport, TraitScheduler};
use crate::workers::{Command, TickWorker};

pub struct TraitSystem {
    config: RuntimeConfig,
    lifecycle: Arc<TraitLifecycleManager>,
    scheduler: Arc<TraitScheduler>,
    classes: Arc<ClassRegistry>,
    command_tx: mpsc::Sender<Command>,
    worker: JoinHandle<()>,
}

impl TraitSystem {
    pub fn builder() -> TraitSystemBuilder {
        TraitSystemBuilder::new()
    }

    pub fn register_behaviour(&self, handler: Arc<dyn TraitBehaviour>) {
        self.scheduler.behaviours().register(handler);
    }

    pub fn apply_trait<'a>(
        &self,
        entity: &dyn Entity,
        trait_ref: impl Into<TraitRef<'a>>,
    ) -> Result<bool> {
        self.lifecycle.apply_trait(entity, trait_ref)
    }

    pub fn remove_trait<'a>(
        &self,
        entity: &dyn Entity,
        trait_ref: impl Into<TraitRef<'a>>,
    ) -> Result<bool> {
        self.lifecycle.remove_trait(entity, trait_ref)
    }

    pub fn has_trait(&self, entity: &dyn Entity, code: &str) -> Result<bool> {
        self.lifecycle.has_trait(entity, code)
    }

    /// Replaces trait and class definitions.
    ///
    /// Trait definitions are validated as a batch first; on error nothing is
    /// replaced. Entities keep their active sets, so codes dropped by the
    /// reload show up as stale references on the next tick.
    pub fn reload(
        &self,
        traits: Vec<TraitDefinition>,
        classes: Vec<CharacterClass>,
    ) -> Result<()> {
        warn_duplicates(&traits);
        let trait_count = traits.len();
        let class_count = classes.len();

        self.lifecycle.registry().load(traits)?;
        self.classes.load(classes);

        info!(traits = trait_count, classes = class_count, "trait definitions reloaded");
        Ok(())
    }

    /// Starts ticking `entity` and rebuilds the stat modifiers of the traits
    /// its store already lists.
    pub fn join(&self, entity: Arc<dyn Entity>) -> Result<()> {
        let restored = self.lifecycle.restore_modifiers(entity.as_ref())?;
        let id = entity.id().clone();
        self.scheduler.live().join(entity);
        info!(entity = %id, restored, "entity joined");
        Ok(())
    }

    /// Stops ticking the entity. Its persisted state is left as is.
    pub fn leave(&self, id: &EntityId) -> Option<Arc<dyn Entity>> {
        let entity = self.scheduler.live().leave(id);
        self.lifecycle.release_entity(id);
        if entity.is_some() {
            info!(entity = %id, "entity left");
        }
        entity
    }

    /// Runs a scheduler pass now through the worker.
    pub async fn tick_now(&self) -> Result<TickReport> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::TickNow { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TraitEvent> {
        self.lifecycle.events().subscribe()
    }

    pub fn lifecycle(&self) -> &Arc<TraitLifecycleManager> {
        &self.lifecycle
    }

    pub fn scheduler(&self) -> &Arc<TraitScheduler> {
        &self.scheduler
    }

    pub fn registry(&self) -> &Arc<TraitRegistry> {
        self.lifecycle.registry()
    }

    pub fn classes(&self) -> &Arc<ClassRegistry> {
        &self.classes
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Stops the tick worker and waits for it.
    pub async fn shutdown(self) -> Result<()> {
        let Self {
            command_tx, worker, ..
        } = self;
        drop(command_tx);

        worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

fn warn_duplicates(traits: &[TraitDefinition]) {
    let mut seen = HashSet::new();
    for definition in traits {
        if !seen.insert(definition.code.as_str()) {
            warn!(code = %definition.code, "duplicate trait definition; the later one wins");
        }
    }
}

/// Builder for [`TraitSystem`].
pub struct TraitSystemBuilder {
    config: RuntimeConfig,
    clock: Option<Arc<dyn WorldClock>>,
    traits: Vec<TraitDefinition>,
    classes: Vec<CharacterClass>,
    behaviours: Vec<Arc<dyn TraitBehaviour>>,
}

impl TraitSystemBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            clock: None,
            traits: Vec::new(),
            classes: Vec::new(),
            behaviours: Vec::new(),
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// World clock used for apply and tick. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn WorldClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn traits(mut self, traits: Vec<TraitDefinition>) -> Self {
        self.traits = traits;
        self
    }

    pub fn classes(mut self, classes: Vec<CharacterClass>) -> Self {
        self.classes = classes;
        self
    }

    pub fn behaviour(mut self, handler: Arc<dyn TraitBehaviour>) -> Self {
        self.behaviours.push(handler);
        self
    }

    /// Validates the definitions and spawns the tick worker.
    pub async fn build(self) -> Result<TraitSystem> {
        warn_duplicates(&self.traits);
        let registry = Arc::new(TraitRegistry::from_definitions(self.traits)?);

        let classes = Arc::new(ClassRegistry::new());
        classes.load(self.classes);

        let behaviours = Arc::new(BehaviourRegistry::new());
        for handler in self.behaviours {
            behaviours.register(handler);
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let lifecycle = Arc::new(TraitLifecycleManager::with_events(
            registry, clock, events,
        ));
        let scheduler = Arc::new(TraitScheduler::new(
            Arc::clone(&lifecycle),
            behaviours,
            Arc::new(LiveEntities::new()),
            self.config.scheduler.reschedule,
        ));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let worker = TickWorker::new(
            Arc::clone(&scheduler),
            Duration::from_millis(self.config.scheduler.tick_interval_ms.max(1)),
            command_rx,
        );
        let worker = tokio::spawn(async move {
            worker.run().await;
        });

        info!(
            traits = lifecycle.registry().len(),
            tick_interval_ms = self.config.scheduler.tick_interval_ms,
            "trait system started"
        );

        Ok(TraitSystem {
            config: self.config,
            lifecycle,
            scheduler,
            classes,
            command_tx,
            worker,
        })
    }
}
