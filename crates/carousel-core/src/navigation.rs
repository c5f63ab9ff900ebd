//! Navigation state machine
//!
//! [`Navigator`] is the only writer of the active index, the resetting flag
//! and the transition generation. Autoplay ticks, swipes, indicator taps and
//! driver completions all arrive here as requests; each accepted request
//! yields a [`NavTransition`] that the caller forwards to the transition
//! driver.
//!
//! # Phases
//!
//! ```text
//!            request                     complete(latest)
//!   Idle ─────────────▶ Transitioning ─────────────────────▶ Idle
//!     ▲                      │ complete(latest) on sentinel
//!     │    poll(deadline)    ▼
//!     └──────────────── Wrapping (index 0, resetting)
//! ```
//!
//! The active index is the committed target: it changes as soon as a request
//! is accepted, so back-to-back requests build on each other instead of on
//! wherever the track happens to be mid-animation.

use embassy_time::Instant;
use log::{debug, trace};

use crate::constants::RESET_DELAY;
use crate::error::{CarouselError, CarouselResult};
use crate::sequence::{DisplaySequence, Slot};
use crate::transition::Generation;

/// Where the state machine is between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Resting on the active index
    Idle,
    /// Track is moving toward the active index
    Transitioning { generation: Generation },
    /// Snapped from the sentinel clone back to index 0; the resetting flag
    /// stays raised until `until`
    Wrapping { until: Instant },
}

/// How the driver should move to a new index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Spring animation
    Animated,
    /// Zero-duration move
    Snap,
}

/// A transition the driver must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTransition {
    /// Display index to move to
    pub index: usize,
    /// Tag the driver reports back on completion
    pub generation: Generation,
    pub motion: Motion,
}

/// Owner of the active index and loop wrap bookkeeping.
#[derive(Debug, Clone)]
pub struct Navigator {
    sequence: DisplaySequence,
    index: usize,
    phase: Phase,
    generation: Generation,
    resetting: bool,
}

impl Navigator {
    /// Create a navigator resting on index 0.
    ///
    /// An empty sequence is rejected.
    pub fn new(sequence: DisplaySequence) -> CarouselResult<Self> {
        if sequence.logical_len() == 0 {
            return Err(CarouselError::EmptyItems);
        }
        Ok(Self {
            sequence,
            index: 0,
            phase: Phase::Idle,
            generation: Generation::default(),
            resetting: false,
        })
    }

    pub fn active_index(&self) -> usize {
        self.index
    }

    /// Slot currently targeted by the track.
    pub fn active_slot(&self) -> Slot {
        self.sequence.slot(self.index).unwrap_or(Slot::Real(0))
    }

    /// Indicator lit for the active index.
    pub fn indicator_index(&self) -> usize {
        self.sequence.indicator_index(self.index)
    }

    pub fn is_resetting(&self) -> bool {
        self.resetting
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sequence(&self) -> DisplaySequence {
        self.sequence
    }

    /// Generation of the most recent transition.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Explicitly select a logical item.
    ///
    /// Out-of-range indices are clamped to the last real item. Always
    /// retargets an in-flight transition.
    pub fn select(&mut self, index: usize) -> Option<NavTransition> {
        let last_real = self.sequence.last_real_index();
        let target = if index > last_real {
            debug!("Select {} out of range, clamping to {}", index, last_real);
            last_real
        } else {
            index
        };
        self.move_to(target)
    }

    /// Move one item forward.
    pub fn advance(&mut self) -> Option<NavTransition> {
        let target = match self.sequence.slot(self.index) {
            Some(Slot::SentinelClone) => {
                // Already heading onto the clone; the wrap happens on completion
                return None;
            }
            Some(Slot::Real(i)) if self.sequence.is_looping() && i == self.sequence.last_real_index() => {
                self.sequence.logical_len()
            }
            _ => (self.index + 1).min(self.sequence.last_index()),
        };
        self.move_to(target)
    }

    /// Move one item backward.
    ///
    /// Looping from index 0 jumps straight to the last real item; there is
    /// no leading sentinel.
    pub fn retreat(&mut self) -> Option<NavTransition> {
        let target = if self.sequence.is_looping() && self.index == 0 {
            self.sequence.last_real_index()
        } else {
            self.index.saturating_sub(1)
        };
        self.move_to(target)
    }

    /// Re-issue a transition to the current index.
    ///
    /// Used when the track was displaced (a drag) without changing the index.
    pub fn settle(&mut self) -> NavTransition {
        self.retarget(self.index, Motion::Animated)
    }

    /// Invalidate any outstanding transition without issuing a new one.
    ///
    /// A later completion for the interrupted generation is discarded.
    pub fn interrupt(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        trace!("Interrupting {:?}", self.phase);
        self.generation = self.generation.next();
        self.resetting = false;
        self.phase = Phase::Idle;
    }

    /// Handle a driver completion.
    ///
    /// Completions for anything but the latest generation are ignored. Finishing
    /// on the sentinel clone starts the wrap and returns the snap back to 0.
    pub fn complete(&mut self, generation: Generation, now: Instant) -> Option<NavTransition> {
        if generation != self.generation {
            trace!(
                "Discarding stale completion {:?} (latest {:?})",
                generation,
                self.generation
            );
            return None;
        }

        match self.phase {
            Phase::Transitioning { .. } if self.sequence.is_sentinel(self.index) => {
                self.resetting = true;
                self.index = 0;
                self.generation = self.generation.next();
                self.phase = Phase::Wrapping {
                    until: now + RESET_DELAY,
                };
                debug!("Wrapping from sentinel to 0 ({:?})", self.generation);
                Some(NavTransition {
                    index: 0,
                    generation: self.generation,
                    motion: Motion::Snap,
                })
            }
            Phase::Transitioning { .. } => {
                self.phase = Phase::Idle;
                trace!("Settled on {}", self.index);
                None
            }
            // The wrap snap itself completing; the flag clears on the deadline
            Phase::Wrapping { .. } | Phase::Idle => None,
        }
    }

    /// Advance time-based state. Returns `true` if the resetting flag cleared.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Wrapping { until } if now >= until => {
                self.resetting = false;
                self.phase = Phase::Idle;
                trace!("Wrap finished");
                true
            }
            _ => false,
        }
    }

    /// Switch loop mode, keeping the index valid for the new sequence.
    ///
    /// Leaving loop mode while on the sentinel snaps to index 0, the item the
    /// sentinel displays.
    pub fn set_looping(&mut self, looping: bool) -> Option<NavTransition> {
        if self.sequence.is_looping() == looping {
            return None;
        }
        let on_sentinel = self.sequence.is_sentinel(self.index);
        self.sequence = DisplaySequence::new(self.sequence.logical_len(), looping);

        if let Phase::Wrapping { .. } = self.phase {
            self.resetting = false;
            self.phase = Phase::Idle;
        }

        if on_sentinel {
            debug!("Loop disabled on sentinel, snapping to 0");
            Some(self.retarget(0, Motion::Snap))
        } else {
            None
        }
    }

    fn move_to(&mut self, target: usize) -> Option<NavTransition> {
        if target == self.index {
            return None;
        }
        debug!("Navigating {} -> {}", self.index, target);
        Some(self.retarget(target, Motion::Animated))
    }

    fn retarget(&mut self, target: usize, motion: Motion) -> NavTransition {
        if let Phase::Wrapping { .. } = self.phase {
            trace!("Request during wrap, clearing resetting flag early");
            self.resetting = false;
        }
        self.index = target;
        self.generation = self.generation.next();
        self.phase = Phase::Transitioning {
            generation: self.generation,
        };
        NavTransition {
            index: target,
            generation: self.generation,
            motion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(len: usize, looping: bool) -> Navigator {
        Navigator::new(DisplaySequence::new(len, looping)).unwrap()
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    /// Complete whatever is outstanding, then let any wrap finish.
    fn finish(nav: &mut Navigator, now: Instant) {
        let generation = nav.generation();
        if let Some(snap) = nav.complete(generation, now) {
            nav.complete(snap.generation, now);
        }
        nav.poll(now + RESET_DELAY);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let result = Navigator::new(DisplaySequence::new(0, true));
        assert_eq!(result.err(), Some(CarouselError::EmptyItems));
    }

    #[test]
    fn test_advance_clamps_without_loop() {
        let mut nav = nav(3, false);
        for _ in 0..10 {
            nav.advance();
            finish(&mut nav, at(0));
        }
        assert_eq!(nav.active_index(), 2);
        assert_eq!(nav.advance(), None, "advance at the end is a no-op");

        for _ in 0..10 {
            nav.retreat();
            finish(&mut nav, at(0));
        }
        assert_eq!(nav.active_index(), 0);
        assert_eq!(nav.retreat(), None, "retreat at the start is a no-op");
    }

    #[test]
    fn test_requests_accumulate_mid_transition() {
        let mut nav = nav(5, false);
        let first = nav.advance().unwrap();
        let second = nav.advance().unwrap();

        assert_eq!(first.index, 1);
        assert_eq!(second.index, 2);
        assert!(second.generation > first.generation);
    }

    #[test]
    fn test_loop_advance_moves_onto_sentinel() {
        let mut nav = nav(5, true);
        nav.select(4);
        finish(&mut nav, at(0));

        let step = nav.advance().unwrap();
        assert_eq!(step.index, 5);
        assert_eq!(nav.active_slot(), Slot::SentinelClone);
        assert_eq!(nav.indicator_index(), 0);

        assert_eq!(nav.advance(), None, "advance while heading to the sentinel is a no-op");
    }

    #[test]
    fn test_loop_wrap_is_seamless() {
        let mut nav = nav(5, true);
        nav.select(4);
        finish(&mut nav, at(0));

        let mut observed = alloc::vec::Vec::new();
        let mut resetting = alloc::vec![nav.is_resetting()];

        let step = nav.advance().unwrap();
        observed.push(nav.active_index());

        let snap = nav
            .complete(step.generation, at(1000))
            .expect("completing on the sentinel starts the wrap");
        observed.push(nav.active_index());
        resetting.push(nav.is_resetting());
        assert_eq!(snap.motion, Motion::Snap);
        assert_eq!(snap.index, 0);

        // Snap completes immediately; flag holds until the deadline
        assert_eq!(nav.complete(snap.generation, at(1001)), None);
        assert!(nav.is_resetting());
        assert!(!nav.poll(at(1049)));
        assert!(nav.poll(at(1050)));
        resetting.push(nav.is_resetting());
        observed.push(nav.active_index());

        assert_eq!(observed, alloc::vec![5, 0, 0]);
        assert_eq!(resetting, alloc::vec![false, true, false]);
        assert_eq!(nav.phase(), Phase::Idle);
    }

    #[test]
    fn test_loop_retreat_from_zero_jumps_to_last_real() {
        let mut nav = nav(5, true);
        let step = nav.retreat().unwrap();
        assert_eq!(step.index, 4);
        assert_eq!(step.motion, Motion::Animated);

        assert_eq!(nav.complete(step.generation, at(0)), None);
        assert!(!nav.is_resetting());
    }

    #[test]
    fn test_retreat_from_sentinel() {
        let mut nav = nav(3, true);
        nav.select(2);
        nav.advance();
        assert_eq!(nav.active_index(), 3);

        assert_eq!(nav.retreat().map(|t| t.index), Some(2));
    }

    #[test]
    fn test_select_beats_in_flight_autoplay() {
        let mut nav = nav(5, false);
        let timer_step = nav.advance().unwrap();
        assert_eq!(timer_step.index, 1);

        let selected = nav.select(2).unwrap();
        assert_eq!(nav.complete(timer_step.generation, at(10)), None);
        assert_eq!(nav.active_index(), 2);

        nav.complete(selected.generation, at(20));
        assert_eq!(nav.active_index(), 2);
        assert_eq!(nav.phase(), Phase::Idle);
    }

    #[test]
    fn test_stale_completion_rejected() {
        let mut nav = nav(5, false);
        let a = nav.select(3).unwrap();
        let b = nav.select(1).unwrap();

        nav.complete(a.generation, at(5));
        assert_eq!(nav.active_index(), 1);
        assert_eq!(
            nav.phase(),
            Phase::Transitioning {
                generation: b.generation
            }
        );

        nav.complete(b.generation, at(10));
        nav.complete(a.generation, at(15));
        assert_eq!(nav.active_index(), 1);
        assert_eq!(nav.phase(), Phase::Idle);
    }

    #[test]
    fn test_stale_sentinel_completion_does_not_wrap() {
        let mut nav = nav(3, true);
        nav.select(2);
        let onto_sentinel = nav.advance().unwrap();
        nav.select(1);

        assert_eq!(nav.complete(onto_sentinel.generation, at(0)), None);
        assert!(!nav.is_resetting());
        assert_eq!(nav.active_index(), 1);
    }

    #[test]
    fn test_select_clamps_out_of_range() {
        let mut nav = nav(5, true);
        assert_eq!(nav.select(42).map(|t| t.index), Some(4));
        assert_eq!(nav.select(4), None, "selecting the current target is a no-op");
    }

    #[test]
    fn test_request_during_wrap_cuts_it_short() {
        let mut nav = nav(3, true);
        nav.select(2);
        let step = nav.advance().unwrap();
        nav.complete(step.generation, at(100));
        assert!(nav.is_resetting());

        let next = nav.advance().unwrap();
        assert_eq!(next.index, 1);
        assert_eq!(next.motion, Motion::Animated);
        assert!(!nav.is_resetting());
        assert!(!nav.poll(at(500)), "no wrap left to finish");
    }

    #[test]
    fn test_interrupt_invalidates_outstanding() {
        let mut nav = nav(4, false);
        let step = nav.advance().unwrap();
        nav.interrupt();

        assert_eq!(nav.phase(), Phase::Idle);
        assert_eq!(nav.complete(step.generation, at(0)), None);
        assert_eq!(nav.active_index(), 1);

        let settle = nav.settle();
        assert_eq!(settle.index, 1);
        assert!(settle.generation > step.generation);
    }

    #[test]
    fn test_disabling_loop_on_sentinel_snaps_home() {
        let mut nav = nav(3, true);
        nav.select(2);
        nav.advance();

        let snap = nav.set_looping(false).unwrap();
        assert_eq!(snap.index, 0);
        assert_eq!(snap.motion, Motion::Snap);
        assert_eq!(nav.sequence().len(), 3);
        assert_eq!(nav.set_looping(false), None);
    }

    #[test]
    fn test_single_item_loop() {
        let mut nav = nav(1, true);
        assert_eq!(nav.retreat(), None);

        let step = nav.advance().unwrap();
        assert_eq!(step.index, 1);
        let snap = nav.complete(step.generation, at(0)).unwrap();
        assert_eq!(snap.index, 0);
    }

    #[test]
    fn test_index_always_in_range() {
        // Small LCG keeps the walk deterministic
        let mut seed: u32 = 0x2545_f491;
        let mut next = || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            seed >> 16
        };

        for &(len, looping) in &[(1, false), (1, true), (4, false), (4, true), (7, true)] {
            let mut nav = nav(len, looping);
            let mut outstanding = alloc::vec::Vec::new();
            let mut now = 0u64;

            for _ in 0..2000 {
                now += (next() % 40) as u64;
                let issued = match next() % 6 {
                    0 => nav.advance(),
                    1 => nav.retreat(),
                    2 => nav.select(next() as usize % (len + 3)),
                    3 => Some(nav.settle()),
                    4 => {
                        if outstanding.is_empty() {
                            None
                        } else {
                            let pick = next() as usize % outstanding.len();
                            let generation: Generation = outstanding.swap_remove(pick);
                            nav.complete(generation, at(now))
                        }
                    }
                    _ => {
                        nav.poll(at(now));
                        None
                    }
                };
                if let Some(transition) = issued {
                    outstanding.push(transition.generation);
                }

                let display_len = nav.sequence().len();
                assert!(
                    nav.active_index() < display_len,
                    "index {} out of range for {}",
                    nav.active_index(),
                    display_len
                );
                if !looping {
                    assert!(nav.active_index() < len);
                }
                if nav.is_resetting() {
                    assert_eq!(nav.active_index(), 0);
                }
            }
        }
    }
}
