//! World clock contract.

/// Source of world time in elapsed seconds.
///
/// Must be monotonic and, for persisted fire times to stay meaningful, must
/// keep counting across process restarts.
pub trait WorldClock: Send + Sync {
    fn elapsed_seconds(&self) -> i64;
}

impl<F> WorldClock for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn elapsed_seconds(&self) -> i64 {
        self()
    }
}
