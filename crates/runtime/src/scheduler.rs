//! Periodic advancement of temporary traits.
//!
//! One [`TraitScheduler::tick`] visits every live entity. Per entity it runs
//! three phases:
//!
//! 1. **Plan** under the entity lock: read the active set and collect firings
//!    that are due.
//! 2. **Dispatch** with the lock released: run the behaviour handlers, which
//!    may themselves apply or remove traits on the same entity.
//! 3. **Commit** under the lock again: consume one repeat, reschedule or
//!    expire, unless the trait was removed or re-applied in the meantime.
//!
//! Failures are isolated per trait and per entity and reported through
//! [`TickReport`]; nothing here surfaces an error to a caller. Passes are
//! serialized: a second [`TraitScheduler::tick`] waits for the running one,
//! so a due firing is never dispatched twice.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, warn};
use trait_core::{
    BehaviourRegistry, Entity, EntityId, EntityTraitState, ErrorSeverity, Firing, FiringOutcome,
    FiringPlan, RescheduleMode, ops,
};

use crate::api::{Result, RuntimeError};
use crate::events::TraitEvent;
use crate::lifecycle::TraitLifecycleManager;
use crate::live::LiveEntities;

/// Counters of one scheduler pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Entities visited.
    pub entities: usize,
    /// Firings committed, including final ones.
    pub fired: usize,
    /// Traits removed after their last firing.
    pub expired: usize,
    /// Active codes missing from the registry.
    pub stale: usize,
    /// Traits or entities skipped because of an error.
    pub failed: usize,
}

pub struct TraitScheduler {
    lifecycle: Arc<TraitLifecycleManager>,
    behaviours: Arc<BehaviourRegistry>,
    live: Arc<LiveEntities>,
    reschedule: RescheduleMode,
    pass: Mutex<()>,
}

impl TraitScheduler {
    pub fn new(
        lifecycle: Arc<TraitLifecycleManager>,
        behaviours: Arc<BehaviourRegistry>,
        live: Arc<LiveEntities>,
        reschedule: RescheduleMode,
    ) -> Self {
        Self {
            lifecycle,
            behaviours,
            live,
            reschedule,
            pass: Mutex::new(()),
        }
    }

    pub fn live(&self) -> &Arc<LiveEntities> {
        &self.live
    }

    pub fn behaviours(&self) -> &Arc<BehaviourRegistry> {
        &self.behaviours
    }

    pub fn reschedule(&self) -> RescheduleMode {
        self.reschedule
    }

    /// Runs one pass over a snapshot of the live entities.
    ///
    /// Blocks while another pass is running.
    pub fn tick(&self) -> TickReport {
        let _pass = self.pass.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.lifecycle.now();
        let mut report = TickReport::default();

        for entity in self.live.snapshot() {
            report.entities += 1;
            if let Err(e) = self.tick_entity(entity.as_ref(), now, &mut report) {
                report.failed += 1;
                log_failure(entity.id(), None, &e, "trait tick failed for entity");
            }
        }

        debug!(
            now,
            entities = report.entities,
            fired = report.fired,
            expired = report.expired,
            stale = report.stale,
            failed = report.failed,
            "trait tick finished"
        );
        report
    }

    fn tick_entity(&self, entity: &dyn Entity, now: i64, report: &mut TickReport) -> Result<()> {
        let due = self
            .lifecycle
            .locked(entity.id(), || self.plan_entity(entity, now, report))??;

        for firing in &due {
            if let Err(e) = self.fire(entity, firing, now, report) {
                report.failed += 1;
                log_failure(
                    entity.id(),
                    Some(firing.code()),
                    &e,
                    "trait firing failed; retried next tick",
                );
            }
        }
        Ok(())
    }

    /// Collects due firings. Runs under the entity lock.
    fn plan_entity(
        &self,
        entity: &dyn Entity,
        now: i64,
        report: &mut TickReport,
    ) -> Result<Vec<Firing>> {
        let events = self.lifecycle.events();
        let mut due = Vec::new();

        for code in EntityTraitState::of(entity).active_codes()? {
            let Ok(definition) = self.lifecycle.registry().lookup(&code) else {
                report.stale += 1;
                warn!(entity = %entity.id(), %code, "active trait is not registered; skipped");
                events.publish(TraitEvent::StaleReference {
                    entity: entity.id().clone(),
                    code,
                });
                continue;
            };

            match ops::plan(entity, &definition, now) {
                Ok(FiringPlan::Idle) => {}
                Ok(FiringPlan::Due(firing)) => due.push(firing),
                Ok(FiringPlan::MissingTimer) => {
                    warn!(entity = %entity.id(), %code, "temporary trait has no timer; removed");
                    match ops::remove(entity, &definition) {
                        Ok(_) => events.publish(TraitEvent::Removed {
                            entity: entity.id().clone(),
                            code,
                        }),
                        Err(e) => {
                            report.failed += 1;
                            log_failure(
                                entity.id(),
                                Some(&code),
                                &RuntimeError::from(e),
                                "failed to remove trait without timer",
                            );
                        }
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    log_failure(
                        entity.id(),
                        Some(&code),
                        &RuntimeError::from(e),
                        "failed to read trait timer",
                    );
                }
            }
        }

        Ok(due)
    }

    fn fire(
        &self,
        entity: &dyn Entity,
        firing: &Firing,
        now: i64,
        report: &mut TickReport,
    ) -> Result<()> {
        ops::dispatch(entity, firing, &self.behaviours)?;

        let outcome = self.lifecycle.locked(entity.id(), || {
            ops::commit(entity, firing, now, self.reschedule)
        })??;

        let events = self.lifecycle.events();
        let code = firing.code().to_string();
        match outcome {
            FiringOutcome::Rescheduled(timer) => {
                report.fired += 1;
                debug!(
                    entity = %entity.id(),
                    %code,
                    remaining = timer.remaining_repeats,
                    next_fire_at = timer.next_fire_at,
                    "trait fired"
                );
                events.publish(TraitEvent::Fired {
                    entity: entity.id().clone(),
                    code,
                    remaining: timer.remaining_repeats,
                });
            }
            FiringOutcome::Expired => {
                report.fired += 1;
                report.expired += 1;
                debug!(entity = %entity.id(), %code, "trait fired for the last time and expired");
                events.publish(TraitEvent::Fired {
                    entity: entity.id().clone(),
                    code: code.clone(),
                    remaining: 0,
                });
                events.publish(TraitEvent::Expired {
                    entity: entity.id().clone(),
                    code,
                });
            }
            FiringOutcome::Superseded => {
                debug!(entity = %entity.id(), %code, "trait changed during dispatch; firing dropped");
            }
        }
        Ok(())
    }
}

/// Handler failures are retried and logged as warnings; broken stores and
/// locks are errors.
fn log_failure(entity: &EntityId, code: Option<&str>, error: &RuntimeError, message: &str) {
    let code = code.unwrap_or("-");
    let kind = error.error_code();
    match error.severity() {
        ErrorSeverity::Fatal => {
            error!(%entity, code, kind, error = %error, "{}", message);
        }
        ErrorSeverity::Validation | ErrorSeverity::Internal => {
            warn!(%entity, code, kind, error = %error, "{}", message);
        }
    }
}
