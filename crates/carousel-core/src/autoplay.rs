//! Autoplay interval timer
//!
//! An [`AutoplayTimer`] exists only while autoplay is allowed to fire. The
//! carousel keeps it in an `Option`: arming creates a fresh timer with a full
//! period, suspension (hover, drag) and disabling drop it. There is never a
//! partially elapsed period carried across a suspension.

use embassy_time::{Duration, Instant};
use log::trace;

/// Periodic "advance" source with a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoplayTimer {
    period: Duration,
    next_due: Instant,
}

impl AutoplayTimer {
    /// Arm a timer whose first tick is one full `period` after `now`.
    pub fn start(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Instant of the next tick.
    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Returns `true` when a tick is due at `now`.
    ///
    /// At most one tick is reported per poll; a late poll schedules the next
    /// tick a full period from `now` rather than bursting to catch up.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }

        let mut next = self.next_due + self.period;
        if next <= now {
            next = now + self.period;
        }
        trace!(
            "Autoplay tick at {}ms, next at {}ms",
            now.as_millis(),
            next.as_millis()
        );
        self.next_due = next;
        true
    }
}
