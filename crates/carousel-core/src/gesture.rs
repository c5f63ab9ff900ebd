//! Drag tracking and swipe classification
//!
//! [`DragTracker`] reduces a press/drag/release sequence to a [`DragEnd`]
//! (total horizontal offset and release velocity). [`interpret`] then turns
//! that pair into a [`SwipeIntent`] using a distance threshold that scales
//! with the item width and a fixed velocity threshold.

use embassy_time::{Duration, Instant};
use heapless::Deque;

use crate::constants::{
    MAX_DRAG_SAMPLES, SWIPE_DISTANCE_RATIO, SWIPE_VELOCITY_THRESHOLD, VELOCITY_SAMPLE_WINDOW,
};

/// Direction requested by a completed drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeIntent {
    /// Move to the next item (drag toward the left)
    Advance,
    /// Move to the previous item (drag toward the right)
    Retreat,
    /// Stay on the current item
    None,
}

/// Horizontal summary of a finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEnd {
    /// Total travel since the press, negative toward the left (px)
    pub offset_x: f32,
    /// Release velocity, negative toward the left (px/s)
    pub velocity_x: f32,
}

/// Classify a finished drag.
///
/// Advance is checked first, so a degenerate drag that satisfies both
/// conditions advances.
pub fn interpret(offset_px: f32, velocity_px_per_s: f32, item_width_px: f32) -> SwipeIntent {
    let threshold = item_width_px * SWIPE_DISTANCE_RATIO;

    let should_advance = offset_px < -threshold || velocity_px_per_s < -SWIPE_VELOCITY_THRESHOLD;
    let should_retreat = offset_px > threshold || velocity_px_per_s > SWIPE_VELOCITY_THRESHOLD;

    if should_advance {
        SwipeIntent::Advance
    } else if should_retreat {
        SwipeIntent::Retreat
    } else {
        SwipeIntent::None
    }
}

#[derive(Debug, Clone, Copy)]
struct DragSample {
    x: i32,
    at: Instant,
}

/// Accumulates horizontal pointer samples for one drag.
#[derive(Debug)]
pub struct DragTracker {
    origin_x: i32,
    samples: Deque<DragSample, MAX_DRAG_SAMPLES>,
}

impl DragTracker {
    /// Start tracking at the press position.
    pub fn start(x: i32, now: Instant) -> Self {
        let mut tracker = Self {
            origin_x: x,
            samples: Deque::new(),
        };
        tracker.record(x, now);
        tracker
    }

    /// Record a move and return the offset from the press position.
    pub fn record(&mut self, x: i32, now: Instant) -> f32 {
        if self.samples.is_full() {
            self.samples.pop_front();
        }
        // Capacity was just ensured above
        let _ = self.samples.push_back(DragSample { x, at: now });
        self.offset()
    }

    /// Offset of the latest sample from the press position.
    pub fn offset(&self) -> f32 {
        self.samples
            .back()
            .map(|s| (s.x - self.origin_x) as f32)
            .unwrap_or(0.0)
    }

    /// Finish the drag at `x`.
    pub fn finish(mut self, x: i32, now: Instant) -> DragEnd {
        self.record(x, now);
        DragEnd {
            offset_x: self.offset(),
            velocity_x: self.velocity(now),
        }
    }

    /// Velocity over the samples inside the trailing window ending at `now`.
    fn velocity(&self, now: Instant) -> f32 {
        let Some(latest) = self.samples.back() else {
            return 0.0;
        };

        let window_start = now
            .checked_sub(VELOCITY_SAMPLE_WINDOW)
            .unwrap_or(Instant::from_ticks(0));

        // Oldest sample still inside the window that moved differently
        let Some(oldest) = self
            .samples
            .iter()
            .find(|s| s.at >= window_start && s.at < latest.at)
        else {
            return 0.0;
        };

        let elapsed: Duration = latest.at - oldest.at;
        let micros = elapsed.as_micros();
        if micros == 0 {
            return 0.0;
        }

        (latest.x - oldest.x) as f32 * 1_000_000.0 / micros as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_distance_threshold_is_quarter_width() {
        assert_eq!(interpret(-76.0, 0.0, 300.0), SwipeIntent::Advance);
        assert_eq!(interpret(-74.0, 0.0, 300.0), SwipeIntent::None);
        assert_eq!(interpret(76.0, 0.0, 300.0), SwipeIntent::Retreat);
        assert_eq!(interpret(75.0, 0.0, 300.0), SwipeIntent::None);
    }

    #[test]
    fn test_velocity_threshold_is_fixed() {
        assert_eq!(interpret(0.0, -301.0, 300.0), SwipeIntent::Advance);
        assert_eq!(interpret(0.0, 301.0, 300.0), SwipeIntent::Retreat);
        assert_eq!(interpret(0.0, -301.0, 1000.0), SwipeIntent::Advance);
        assert_eq!(interpret(50.0, 250.0, 300.0), SwipeIntent::None);
    }

    #[test]
    fn test_advance_wins_degenerate_drag() {
        // Far right but flicked hard left
        assert_eq!(interpret(200.0, -500.0, 300.0), SwipeIntent::Advance);
    }

    #[test]
    fn test_zero_width_swipes_on_any_travel() {
        assert_eq!(interpret(-1.0, 0.0, 0.0), SwipeIntent::Advance);
        assert_eq!(interpret(0.0, 0.0, 0.0), SwipeIntent::None);
    }

    #[test]
    fn test_tracker_offset_and_velocity() {
        let mut tracker = DragTracker::start(200, at(1000));
        assert_eq!(tracker.record(180, at(1020)), -20.0);
        tracker.record(160, at(1040));

        let end = tracker.finish(140, at(1060));
        assert_eq!(end.offset_x, -60.0);
        // 60 px over 60 ms
        assert_eq!(end.velocity_x, -1000.0);
    }

    #[test]
    fn test_tracker_ignores_samples_outside_window() {
        let mut tracker = DragTracker::start(0, at(0));
        tracker.record(100, at(500));

        let end = tracker.finish(110, at(550));
        assert_eq!(end.offset_x, 110.0);
        // Only the 500ms sample is inside the window: 10 px over 50 ms
        assert_eq!(end.velocity_x, 200.0);
    }

    #[test]
    fn test_dwell_before_release_has_no_velocity() {
        let mut tracker = DragTracker::start(0, at(0));
        tracker.record(-120, at(50));

        let end = tracker.finish(-120, at(800));
        assert_eq!(end.offset_x, -120.0);
        assert_eq!(end.velocity_x, 0.0);
        assert_eq!(interpret(end.offset_x, end.velocity_x, 268.0), SwipeIntent::Advance);
    }

    #[test]
    fn test_tracker_keeps_bounded_history() {
        let mut tracker = DragTracker::start(0, at(0));
        for i in 1..(MAX_DRAG_SAMPLES as u64 * 2) {
            tracker.record(-(i as i32), at(i));
        }
        assert_eq!(tracker.samples.len(), MAX_DRAG_SAMPLES);
        assert_eq!(tracker.offset(), -(MAX_DRAG_SAMPLES as f32 * 2.0 - 1.0));
    }
}
