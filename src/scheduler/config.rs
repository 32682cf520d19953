//! Scheduler configuration.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;

/// Default initial queue capacity.
pub const DEFAULT_CAPACITY: usize = 10;

/// Tunables for [`FairScheduler`](super::FairScheduler).
///
/// Missing fields fall back to their defaults when deserializing.
///
/// # Example
/// ```
/// use std::num::NonZeroU64;
/// use u_fairshare::scheduler::SchedulerConfig;
///
/// let config = SchedulerConfig::new()
///     .with_capacity(64)
///     .with_time_slice(NonZeroU64::new(4).unwrap());
/// assert_eq!(config.time_slice.get(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Initial process queue capacity (grows on demand).
    pub capacity: usize,
    /// Virtual runtime added to the running process per tick.
    pub time_slice: NonZeroU64,
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            time_slice: NonZeroU64::MIN,
        }
    }

    /// Sets the initial queue capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the per-tick vruntime increment.
    pub fn with_time_slice(mut self, time_slice: NonZeroU64) -> Self {
        self.time_slice = time_slice;
        self
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}
