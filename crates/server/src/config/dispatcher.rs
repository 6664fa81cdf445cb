use hookcast_dispatcher::DispatcherConfig;
use serde::Deserialize;

/// Fan-out tuning.
#[derive(Debug, Deserialize)]
pub struct DispatcherSettings {
    /// Maximum number of deliveries of one event in flight at once.
    #[serde(default = "default_max_concurrent_deliveries")]
    pub max_concurrent_deliveries: usize,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            max_concurrent_deliveries: default_max_concurrent_deliveries(),
        }
    }
}

impl DispatcherSettings {
    pub fn to_dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            max_concurrent_deliveries: self.max_concurrent_deliveries,
        }
    }
}

fn default_max_concurrent_deliveries() -> usize {
    DispatcherConfig::default().max_concurrent_deliveries
}
