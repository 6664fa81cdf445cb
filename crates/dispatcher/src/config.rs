/// Tuning knobs for the [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Maximum number of deliveries of one event in flight at once.
    /// Values below 1 are treated as 1.
    pub max_concurrent_deliveries: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_deliveries: 32,
        }
    }
}

impl DispatcherConfig {
    pub(crate) fn concurrency(&self) -> usize {
        self.max_concurrent_deliveries.max(1)
    }
}
