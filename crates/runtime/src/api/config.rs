use trait_core::SchedulerConfig;

/// Runtime configuration shared by the façade and the tick worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub scheduler: SchedulerConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

impl RuntimeConfig {
    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }
}
