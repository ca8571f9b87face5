//! CLI configuration loaded from the environment.
use std::env;
use std::path::PathBuf;

use trait_core::{RescheduleMode, SchedulerConfig};

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub content_dir: PathBuf,
    pub save_dir: PathBuf,
    pub scheduler: SchedulerConfig,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TRAITS_CONTENT_DIR` - Directory holding `traits.json` (default: `./data`)
    /// - `TRAITS_SAVE_DIR` - Directory for entity attribute files (default: platform-specific)
    /// - `TRAITS_TICK_MS` - Scheduler period in milliseconds (default: 100000)
    /// - `TRAITS_RESCHEDULE` - `now` or `deadline` (default: `now`)
    pub fn from_env() -> Self {
        let mut scheduler = SchedulerConfig::new();
        if let Some(tick_ms) = read_env::<u64>("TRAITS_TICK_MS") {
            scheduler = scheduler.with_tick_interval_ms(tick_ms);
        }
        if let Some(mode) = env::var("TRAITS_RESCHEDULE").ok().and_then(|v| parse_reschedule(&v)) {
            scheduler = scheduler.with_reschedule(mode);
        }

        Self {
            content_dir: env::var("TRAITS_CONTENT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            save_dir: env::var("TRAITS_SAVE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_save_dir()),
            scheduler,
        }
    }
}

/// Platform data directory, e.g. `~/.local/share/traits/entities` on Linux.
fn default_save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "traits")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("entities")
}

fn parse_reschedule(value: &str) -> Option<RescheduleMode> {
    match value.trim().to_ascii_lowercase().as_str() {
        "now" => Some(RescheduleMode::FromNow),
        "deadline" => Some(RescheduleMode::FromDeadline),
        _ => None,
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
