//! Cool-down between successful submissions

use chrono::{DateTime, TimeDelta, Utc};

/// Default cool-down window in seconds
pub const COOL_DOWN_SECS: i64 = 60;

/// Rejects a new submission while the window since the last successful one is still open.
/// Holds no state of its own; the caller owns the last submission timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    window: TimeDelta,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(TimeDelta::seconds(COOL_DOWN_SECS))
    }
}

impl RateLimiter {
    pub fn new(window: TimeDelta) -> Self {
        Self { window }
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    pub fn allow(&self, now: DateTime<Utc>, last: Option<DateTime<Utc>>) -> bool {
        match last {
            None => true,
            Some(last) => now - last >= self.window,
        }
    }

    /// Remaining cool-down, or `None` when a submission is allowed
    pub fn retry_after(&self, now: DateTime<Utc>, last: Option<DateTime<Utc>>) -> Option<TimeDelta> {
        let last = last?;
        let remaining = self.window - (now - last);
        (remaining > TimeDelta::zero()).then_some(remaining)
    }
}
