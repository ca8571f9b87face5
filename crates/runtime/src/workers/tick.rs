//! Tick worker that drives [`TraitScheduler::tick`] periodically.
//!
//! Ticks never overlap: the next interval tick is only awaited after the
//! previous pass has finished, and late ticks are delayed rather than bunched.
//! The pass itself runs on the blocking pool since handlers and stores may do
//! synchronous I/O.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error};

use crate::scheduler::{TickReport, TraitScheduler};

/// Commands that can be sent to the tick worker
pub enum Command {
    /// Run a pass immediately, independent of the timer.
    TickNow { reply: oneshot::Sender<TickReport> },
}

/// Background task that periodically advances temporary traits.
pub struct TickWorker {
    scheduler: Arc<TraitScheduler>,
    period: Duration,
    command_rx: mpsc::Receiver<Command>,
}

impl TickWorker {
    pub fn new(
        scheduler: Arc<TraitScheduler>,
        period: Duration,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            scheduler,
            period,
            command_rx,
        }
    }

    /// Main worker loop. Returns once every command sender is dropped.
    pub async fn run(mut self) {
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    run_tick(Arc::clone(&self.scheduler)).await;
                }
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
            }
        }

        debug!("tick worker stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::TickNow { reply } => {
                if let Some(report) = run_tick(Arc::clone(&self.scheduler)).await {
                    let _ = reply.send(report);
                }
            }
        }
    }
}

async fn run_tick(scheduler: Arc<TraitScheduler>) -> Option<TickReport> {
    match tokio::task::spawn_blocking(move || scheduler.tick()).await {
        Ok(report) => Some(report),
        Err(e) => {
            error!(error = %e, "trait tick task failed");
            None
        }
    }
}
