//! World clock implementations.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use trait_core::WorldClock;

/// Wall-clock seconds since the Unix epoch.
///
/// Keeps counting across restarts, so persisted fire times stay valid.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WorldClock for SystemClock {
    fn elapsed_seconds(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// Clock advanced explicitly by the host (or a test).
#[derive(Debug, Default)]
pub struct ManualClock {
    seconds: AtomicI64,
}

impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            seconds: AtomicI64::new(start),
        }
    }

    pub fn set(&self, seconds: i64) {
        self.seconds.store(seconds, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: i64) -> i64 {
        self.seconds.fetch_add(seconds, Ordering::SeqCst) + seconds
    }
}

impl WorldClock for ManualClock {
    fn elapsed_seconds(&self) -> i64 {
        self.seconds.load(Ordering::SeqCst)
    }
}
