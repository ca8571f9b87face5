//! Worker tasks that back the runtime orchestration.
//!
//! The tick worker drives the trait scheduler on a fixed period and on demand.

mod tick;

pub use tick::{Command, TickWorker};
