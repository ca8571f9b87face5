/// Scheduler tuning shared by the runtime and the content loaders.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SchedulerConfig {
    /// Wall-clock period between ticks, in milliseconds.
    pub tick_interval_ms: u64,

    pub reschedule: RescheduleMode,
}

impl SchedulerConfig {
    /// One tick every 100 seconds.
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100_000;

    pub fn new() -> Self {
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            reschedule: RescheduleMode::default(),
        }
    }

    pub fn with_tick_interval_ms(mut self, tick_interval_ms: u64) -> Self {
        self.tick_interval_ms = tick_interval_ms.max(1);
        self
    }

    pub fn with_reschedule(mut self, reschedule: RescheduleMode) -> Self {
        self.reschedule = reschedule;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// How the next fire time is computed after a firing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RescheduleMode {
    /// `now + duration`. Delayed ticks push every later firing back.
    #[default]
    FromNow,

    /// `previous deadline + duration`. Keeps the period fixed; a trait that
    /// fell behind fires on consecutive ticks until it catches up.
    FromDeadline,
}

impl RescheduleMode {
    pub fn next_fire_at(self, deadline: i64, now: i64, duration_seconds: i64) -> i64 {
        match self {
            Self::FromNow => now.saturating_add(duration_seconds),
            Self::FromDeadline => deadline.saturating_add(duration_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reschedule_modes_differ_only_under_delay() {
        assert_eq!(RescheduleMode::FromNow.next_fire_at(60, 60, 60), 120);
        assert_eq!(RescheduleMode::FromDeadline.next_fire_at(60, 60, 60), 120);

        assert_eq!(RescheduleMode::FromNow.next_fire_at(60, 95, 60), 155);
        assert_eq!(RescheduleMode::FromDeadline.next_fire_at(60, 95, 60), 120);
    }

    #[test]
    fn unbounded_duration_saturates() {
        assert_eq!(RescheduleMode::FromNow.next_fire_at(0, 10, i64::MAX), i64::MAX);
        assert_eq!(
            RescheduleMode::FromDeadline.next_fire_at(i64::MAX, 10, i64::MAX),
            i64::MAX
        );
    }

    #[test]
    fn tick_interval_is_never_zero() {
        assert_eq!(SchedulerConfig::new().with_tick_interval_ms(0).tick_interval_ms, 1);
    }
}
