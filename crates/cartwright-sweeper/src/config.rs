//! Sweeper configuration.

use std::time::Duration as StdDuration;

use chrono::Duration;

/// Thresholds and batching for the abandonment sweeper.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Idle time after which an active cart is marked abandoned.
    pub abandon_after: Duration,
    /// Time after abandonment at which a cart is permanently removed.
    pub remove_after: Duration,
    /// Maximum carts fetched per repository query; passes loop over
    /// batches rather than loading the full result set.
    pub batch_size: i64,
    /// Interval between ticks when driven by `run_on_interval`.
    pub tick_interval: StdDuration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            abandon_after: Duration::hours(3),
            remove_after: Duration::days(7),
            batch_size: 100,
            tick_interval: StdDuration::from_secs(30 * 60),
        }
    }
}
