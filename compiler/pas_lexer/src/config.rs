//! Construction parameters for [`DoubleBufferedSource`](crate::DoubleBufferedSource).

use std::time::Duration;

use crate::SourceError;

/// Default bytes per slot.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Default bound on a single wait for a slot state change.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Source configuration.
///
/// `capacity` only affects prefetch granularity; the token stream is the
/// same for every capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceConfig {
    /// Bytes per slot (`C`). Always at least 1.
    capacity: usize,
    /// Upper bound on one timed wait before the waiting thread rechecks
    /// the shared flags.
    poll_interval: Duration,
}

impl SourceConfig {
    /// Configuration with the given chunk capacity.
    pub fn new(capacity: usize) -> Result<Self, SourceError> {
        if capacity == 0 {
            return Err(SourceError::ZeroCapacity);
        }
        Ok(SourceConfig {
            capacity,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Replace the poll interval. A zero interval is raised to 1ms.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Bytes per slot.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bound on a single slot wait.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            capacity: DEFAULT_CAPACITY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
