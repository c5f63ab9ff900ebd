//! Carousel widget
//!
//! [`Carousel`] wires the pieces together: it owns the geometry, the
//! navigation state machine, the transition driver and the autoplay timer,
//! and turns pointer input and clock ticks into requests. The host calls
//! [`Carousel::tick`] once per frame and drains [`Carousel::pop_event`].
//!
//! Autoplay runs only while the widget is mounted, autoplay is enabled, no
//! drag is in progress and (with pause-on-hover) the pointer is outside.
//! Every time that condition becomes true again the timer starts over with a
//! full period.

use embassy_time::Instant;
use embedded_graphics::primitives::Rectangle;
use heapless::Deque;
use log::{debug, trace};

use crate::autoplay::AutoplayTimer;
use crate::config::CarouselConfig;
use crate::constants::EVENT_QUEUE_CAPACITY;
use crate::error::CarouselResult;
use crate::geometry::{Geometry, rotation_deg};
use crate::gesture::{DragEnd, DragTracker, SwipeIntent, interpret};
use crate::navigation::{Motion, NavTransition, Navigator};
use crate::sequence::{CarouselItem, DisplaySequence, Slot};
use crate::transition::{AnimationRequest, SpringConfig, SpringDriver, Timing, TransitionDriver};
use crate::ui::colors::CarouselPalette;
use crate::ui::core::{Action, TouchEvent, TouchResult};
use crate::ui::track::TrackView;

/// Notifications for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
    /// The committed display index changed
    ActiveIndexChanged { index: usize },
    /// A drag was released and classified
    GestureClassified(SwipeIntent),
}

#[derive(Debug)]
struct ActiveDrag {
    tracker: DragTracker,
    /// Track position when the press landed
    origin_px: f32,
}

/// Gesture-driven carousel over `item_count` items.
pub struct Carousel<D: TransitionDriver = SpringDriver> {
    config: CarouselConfig,
    geometry: Geometry,
    navigator: Navigator,
    driver: D,
    autoplay: Option<AutoplayTimer>,
    drag: Option<ActiveDrag>,
    hovered: bool,
    mounted: bool,
    reported_index: usize,
    events: Deque<CarouselEvent, EVENT_QUEUE_CAPACITY>,
}

impl<D: TransitionDriver> Carousel<D> {
    /// Build an unmounted carousel resting on the first item.
    ///
    /// Fails with [`CarouselError::EmptyItems`](crate::error::CarouselError::EmptyItems)
    /// when `item_count` is zero.
    pub fn new(config: CarouselConfig, item_count: usize, mut driver: D) -> CarouselResult<Self> {
        let config = config.validated();
        let navigator = Navigator::new(DisplaySequence::new(item_count, config.loop_items))?;
        let geometry = Geometry::new(config.base_width_px);
        driver.jump_to(geometry.position_for(0));

        Ok(Self {
            config,
            geometry,
            navigator,
            driver,
            autoplay: None,
            drag: None,
            hovered: false,
            mounted: false,
            reported_index: 0,
            events: Deque::new(),
        })
    }

    /// Attach to a container of `measured_width_px` (`None` if not laid out yet).
    pub fn mount(&mut self, measured_width_px: Option<u32>, now: Instant) {
        let item_width = self.geometry.mount(measured_width_px);
        debug!(
            "Mounting carousel: {} items, item width {}px",
            self.navigator.sequence().logical_len(),
            item_width
        );

        self.mounted = true;
        self.driver
            .jump_to(self.geometry.position_for(self.navigator.active_index()));

        // Unmounted while heading onto the clone: finish the wrap now
        if self.navigator.active_slot() == Slot::SentinelClone {
            let transition = self.navigator.settle();
            self.apply(transition, None);
        }
        self.restart_autoplay(now);
    }

    /// Drop the timer and any drag; the state is kept for a later mount.
    pub fn unmount(&mut self) {
        debug!("Unmounting carousel");
        self.mounted = false;
        self.autoplay = None;
        self.drag = None;
        self.navigator.interrupt();
        self.driver.jump_to(self.driver.position());
    }

    /// Container width changed.
    ///
    /// The active index and any in-flight transition survive; positions are
    /// scaled to the new stride.
    pub fn resize(&mut self, container_width_px: u32) {
        let old_stride = self.geometry.stride();
        self.geometry.resize(container_width_px);
        let new_stride = self.geometry.stride();
        if old_stride <= 0.0 || old_stride == new_stride {
            return;
        }

        let factor = new_stride / old_stride;
        debug!(
            "Resize to {}px, stride {} -> {}",
            container_width_px, old_stride, new_stride
        );
        self.driver.rescale(factor);
        if let Some(drag) = self.drag.as_mut() {
            drag.origin_px *= factor;
        }
    }

    /// Pointer moved over the carousel. Only pauses autoplay with
    /// pause-on-hover enabled.
    pub fn pointer_enter(&mut self, now: Instant) {
        if !self.hovered {
            self.hovered = true;
            if self.config.pause_on_hover {
                self.restart_autoplay(now);
            }
        }
    }

    pub fn pointer_leave(&mut self, now: Instant) {
        if self.hovered {
            self.hovered = false;
            if self.config.pause_on_hover {
                self.restart_autoplay(now);
            }
        }
    }

    /// Feed a pointer event over the track.
    ///
    /// A press grabs the track where it is, a drag moves it (with elastic
    /// resistance past either end unless looping) and a release classifies
    /// the gesture.
    pub fn handle_touch(&mut self, event: TouchEvent, now: Instant) -> TouchResult {
        if !self.mounted {
            return TouchResult::NotHandled;
        }

        match event {
            TouchEvent::Press(point) => {
                self.navigator.interrupt();
                let position = self.driver.position();
                self.driver.jump_to(position);
                self.drag = Some(ActiveDrag {
                    tracker: DragTracker::start(point.x as i32, now),
                    origin_px: position,
                });
                self.autoplay = None;
                trace!("Drag started at x={} (track {}px)", point.x, position);
                TouchResult::Handled
            }
            TouchEvent::Drag(point) => {
                let Some(drag) = self.drag.as_mut() else {
                    return TouchResult::NotHandled;
                };
                let raw = drag.origin_px + drag.tracker.record(point.x as i32, now);
                let sequence = self.navigator.sequence();
                let position = if sequence.is_looping() {
                    raw
                } else {
                    self.geometry
                        .constrain_drag(raw, self.geometry.drag_bounds(sequence.len()))
                };
                self.driver.jump_to(position);
                TouchResult::Handled
            }
            TouchEvent::Release(point) => {
                let Some(drag) = self.drag.take() else {
                    return TouchResult::NotHandled;
                };
                let end = drag.tracker.finish(point.x as i32, now);
                let intent = self.release_drag(end, now);
                TouchResult::Action(Action::Swipe(intent))
            }
        }
    }

    /// Classify a finished drag and navigate accordingly.
    ///
    /// A drag that does not cross either threshold, or that cannot move
    /// further, springs back to the active item.
    pub fn release_drag(&mut self, end: DragEnd, now: Instant) -> SwipeIntent {
        self.drag = None;
        let intent = interpret(end.offset_x, end.velocity_x, self.geometry.item_width());
        debug!(
            "Drag released: offset {}px, velocity {}px/s -> {:?}",
            end.offset_x, end.velocity_x, intent
        );
        self.emit(CarouselEvent::GestureClassified(intent));

        let requested = match intent {
            SwipeIntent::Advance => self.navigator.advance(),
            SwipeIntent::Retreat => self.navigator.retreat(),
            SwipeIntent::None => None,
        };
        let transition = requested.unwrap_or_else(|| self.navigator.settle());
        // A release without motion keeps whatever momentum the spring has
        let velocity = (end.velocity_x != 0.0).then_some(end.velocity_x);
        self.apply(transition, velocity);
        self.restart_autoplay(now);
        intent
    }

    /// Jump to a logical item, e.g. from an indicator tap.
    ///
    /// Overrides any transition in flight. Out-of-range indices are clamped.
    pub fn select(&mut self, index: usize) {
        if let Some(transition) = self.navigator.select(index) {
            self.apply(transition, None);
        }
    }

    pub fn set_autoplay(&mut self, enabled: bool, now: Instant) {
        self.config.autoplay = enabled;
        self.restart_autoplay(now);
    }

    /// Change the autoplay period; values under the minimum are clamped.
    pub fn set_autoplay_delay(&mut self, delay_ms: u32, now: Instant) {
        self.config.autoplay_delay_ms = delay_ms;
        self.config = self.config.validated();
        self.restart_autoplay(now);
    }

    pub fn set_pause_on_hover(&mut self, pause: bool, now: Instant) {
        self.config.pause_on_hover = pause;
        self.restart_autoplay(now);
    }

    /// Toggle loop mode. Leaving loop mode on the sentinel clone snaps to
    /// the first item.
    pub fn set_loop(&mut self, looping: bool, now: Instant) {
        self.config.loop_items = looping;
        if let Some(transition) = self.navigator.set_looping(looping) {
            self.apply(transition, None);
        }
        self.restart_autoplay(now);
    }

    /// Advance timers and the transition driver to `now`.
    pub fn tick(&mut self, now: Instant) {
        let due = self.autoplay.as_mut().is_some_and(|timer| timer.poll(now));
        if due && let Some(transition) = self.navigator.advance() {
            self.apply(transition, None);
        }

        if let Some(generation) = self.driver.poll(now)
            && let Some(transition) = self.navigator.complete(generation, now)
        {
            self.apply(transition, None);
        }

        self.navigator.poll(now);
    }

    pub fn active_index(&self) -> usize {
        self.navigator.active_index()
    }

    pub fn indicator_index(&self) -> usize {
        self.navigator.indicator_index()
    }

    /// Current continuous track position in pixels.
    pub fn position_px(&self) -> f32 {
        self.driver.position()
    }

    /// `true` while the loop wrap snap is in effect.
    pub fn is_resetting(&self) -> bool {
        self.navigator.is_resetting()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Y rotation of the card in display slot `index` at the current position.
    pub fn item_rotation_deg(&self, index: usize) -> f32 {
        rotation_deg(self.driver.position(), index, self.geometry.stride())
    }

    /// Horizontal perspective origin for the active card.
    pub fn perspective_origin_x(&self) -> f32 {
        self.geometry
            .perspective_origin_x(self.navigator.active_index())
    }

    pub fn display_sequence(&self) -> DisplaySequence {
        self.navigator.sequence()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Next pending host notification, oldest first.
    pub fn pop_event(&mut self) -> Option<CarouselEvent> {
        self.events.pop_front()
    }

    /// Frame view of the track for drawing into `bounds`.
    pub fn track_view<'a>(&self, items: &'a [CarouselItem], bounds: Rectangle) -> TrackView<'a> {
        TrackView {
            bounds,
            items,
            sequence: self.navigator.sequence(),
            geometry: self.geometry,
            position_px: self.driver.position(),
            round: self.config.round,
            palette: self.palette(),
        }
    }

    pub fn palette(&self) -> CarouselPalette {
        if self.config.round {
            CarouselPalette::round()
        } else {
            CarouselPalette::square()
        }
    }

    fn autoplay_allowed(&self) -> bool {
        self.mounted
            && self.config.autoplay
            && self.drag.is_none()
            && !(self.config.pause_on_hover && self.hovered)
    }

    /// Re-evaluate autoplay; a running timer always starts a fresh period.
    fn restart_autoplay(&mut self, now: Instant) {
        self.autoplay = self
            .autoplay_allowed()
            .then(|| AutoplayTimer::start(self.config.autoplay_delay(), now));
        trace!(
            "Autoplay {}",
            if self.autoplay.is_some() { "armed" } else { "off" }
        );
    }

    fn apply(&mut self, transition: NavTransition, initial_velocity: Option<f32>) {
        let timing = match transition.motion {
            Motion::Animated => Timing::Spring(SpringConfig::PAGE),
            Motion::Snap => Timing::Immediate,
        };
        self.driver.animate_to(AnimationRequest {
            target_px: self.geometry.position_for(transition.index),
            timing,
            generation: transition.generation,
            initial_velocity,
        });

        let index = self.navigator.active_index();
        if index != self.reported_index {
            self.reported_index = index;
            self.emit(CarouselEvent::ActiveIndexChanged { index });
        }
    }

    fn emit(&mut self, event: CarouselEvent) {
        if self.events.is_full() {
            trace!("Event queue full, dropping oldest");
            self.events.pop_front();
        }
        // Capacity was just ensured above
        let _ = self.events.push_back(event);
    }
}
