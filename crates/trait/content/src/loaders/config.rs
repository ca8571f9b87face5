//! Scheduler configuration loader.

use std::path::Path;

use trait_core::SchedulerConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for scheduler configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`SchedulerConfig`]. Missing keys keep their defaults.
    ///
    /// ```toml
    /// tick_interval_ms = 100000
    /// reschedule = "from_now"
    /// ```
    pub fn load(path: &Path) -> LoadResult<SchedulerConfig> {
        let content = read_file(path)?;
        let config: SchedulerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use trait_core::RescheduleMode;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reschedule = \"from_deadline\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.reschedule, RescheduleMode::FromDeadline);
        assert_eq!(config.tick_interval_ms, SchedulerConfig::DEFAULT_TICK_INTERVAL_MS);
    }
}
