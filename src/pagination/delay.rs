//! Adaptive inter-page delay

use super::types::{MAX_PAGE_DELAY, MIN_PAGE_DELAY};
use std::time::Duration;

/// Responses faster than this shrink the delay
pub const FAST_RESPONSE: Duration = Duration::from_millis(100);

/// Responses slower than this grow the delay
pub const SLOW_RESPONSE: Duration = Duration::from_millis(500);

/// Inter-page delay that follows observed round-trip times
///
/// The value always stays within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    current_ms: u64,
    min_ms: u64,
    max_ms: u64,
}

impl DelayPolicy {
    /// Seed from a user-requested delay, clamped into the default bounds
    pub fn seeded(requested: Duration) -> Self {
        Self::with_bounds(requested, MIN_PAGE_DELAY, MAX_PAGE_DELAY)
    }

    /// Seed with explicit bounds
    pub fn with_bounds(requested: Duration, min: Duration, max: Duration) -> Self {
        let min_ms = min.as_millis() as u64;
        let max_ms = (max.as_millis() as u64).max(min_ms);
        Self {
            current_ms: (requested.as_millis() as u64).clamp(min_ms, max_ms),
            min_ms,
            max_ms,
        }
    }

    /// Current delay
    pub fn current(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    /// Lower bound
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    /// Upper bound
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Adjust after a successful page: -20% when fast, +25% when slow
    pub fn observe(&mut self, round_trip: Duration) {
        if round_trip < FAST_RESPONSE {
            self.current_ms = (self.current_ms * 4 / 5).max(self.min_ms);
        } else if round_trip > SLOW_RESPONSE {
            self.current_ms = (self.current_ms * 5 / 4).min(self.max_ms);
        }
    }

    /// Double the delay after a transient fault
    pub fn back_off(&mut self) {
        self.current_ms = self.current_ms.saturating_mul(2).min(self.max_ms);
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self::seeded(Duration::from_millis(50))
    }
}
