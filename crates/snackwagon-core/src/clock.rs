//! Day clock: wall-clock bounded timing for one day of service.
//!
//! The loop driver ticks at the host frame cadence, which varies, so all
//! temporal decisions derive from instants, never from tick counts. The
//! clock is the single source of truth for elapsed and remaining day
//! time. It uses [`tokio::time::Instant`] so driver tests can run under a
//! paused runtime with auto-advancing time.

use std::time::Duration;

use tokio::time::Instant;

/// Wall-clock view of one bounded day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayClock {
    started_at: Instant,
    duration: Duration,
}

impl DayClock {
    /// Start the clock at `now` for a day of the given length.
    pub const fn start(now: Instant, duration: Duration) -> Self {
        Self {
            started_at: now,
            duration,
        }
    }

    /// Time elapsed since the day started.
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Time left in the day, floored at zero.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    /// Whether the day has run its full duration.
    pub fn is_over(&self, now: Instant) -> bool {
        self.remaining(now) == Duration::ZERO
    }

    /// The instant the day started.
    pub const fn started_at(&self) -> Instant {
        self.started_at
    }

    /// The configured day length.
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}
