//! Transition driver interface and the default spring implementation
//!
//! The navigation core never moves the track itself. It hands an
//! [`AnimationRequest`] to a [`TransitionDriver`], which owns the continuous
//! position and reports completion tagged with the request's [`Generation`].
//!
//! # Contract
//!
//! - Each `animate_to` call completes at most once, reported by `poll`.
//! - A new `animate_to` retargets the running animation; the superseded
//!   generation never completes.
//! - `jump_to` and `rescale` never produce a completion.

use embassy_time::{Duration, Instant};

use crate::constants::{
    SPRING_DAMPING, SPRING_MASS, SPRING_REST_DELTA_PX, SPRING_REST_SPEED, SPRING_STEP_MICROS,
    SPRING_STIFFNESS,
};

/// Upper bound on integration steps per poll (one second of motion)
const MAX_STEPS_PER_POLL: u64 = 1_000_000 / SPRING_STEP_MICROS;

/// Monotonic tag identifying one transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(pub u32);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

/// Physical parameters of a page transition spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// The single spring used for every page transition.
    pub const PAGE: Self = Self {
        stiffness: SPRING_STIFFNESS,
        damping: SPRING_DAMPING,
        mass: SPRING_MASS,
    };
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::PAGE
    }
}

/// How the driver should reach the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timing {
    /// Animate with the page spring
    Spring(SpringConfig),
    /// Move in zero time; used only for the loop wrap snap
    Immediate,
}

/// One request to move the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRequest {
    pub target_px: f32,
    pub timing: Timing,
    pub generation: Generation,
    /// Velocity to start from, e.g. the release speed of a drag (px/s)
    pub initial_velocity: Option<f32>,
}

/// Animation primitive that moves the continuous track position.
pub trait TransitionDriver {
    /// Start or retarget an animation.
    fn animate_to(&mut self, request: AnimationRequest);

    /// Place the track at `position_px`, cancelling any animation.
    fn jump_to(&mut self, position_px: f32);

    /// Scale position, target, and velocity after a stride change.
    fn rescale(&mut self, factor: f32);

    /// Current track position in pixels.
    fn position(&self) -> f32;

    /// Whether a request is still outstanding.
    fn is_animating(&self) -> bool;

    /// Advance to `now`; returns the generation that just completed, if any.
    fn poll(&mut self, now: Instant) -> Option<Generation>;
}

/// Damped spring integrated with a fixed step.
#[derive(Debug, Clone)]
pub struct SpringDriver {
    position: f32,
    velocity: f32,
    target: f32,
    config: SpringConfig,
    active: Option<Generation>,
    finished: Option<Generation>,
    last_tick: Option<Instant>,
}

impl Default for SpringDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SpringDriver {
    pub fn new() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
            config: SpringConfig::PAGE,
            active: None,
            finished: None,
            last_tick: None,
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    fn step(&mut self, dt: f32) {
        let displacement = self.position - self.target;
        let spring_force = -self.config.stiffness * displacement;
        let damping_force = -self.config.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / self.config.mass;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    fn at_rest(&self) -> bool {
        (self.position - self.target).abs() < SPRING_REST_DELTA_PX
            && self.velocity.abs() < SPRING_REST_SPEED
    }
}

impl TransitionDriver for SpringDriver {
    fn animate_to(&mut self, request: AnimationRequest) {
        self.target = request.target_px;
        self.finished = None;

        match request.timing {
            Timing::Immediate => {
                self.position = request.target_px;
                self.velocity = 0.0;
                self.active = None;
                self.last_tick = None;
                self.finished = Some(request.generation);
            }
            Timing::Spring(config) => {
                self.config = config;
                if let Some(velocity) = request.initial_velocity {
                    self.velocity = velocity;
                }
                if self.active.is_none() {
                    self.last_tick = None;
                }
                self.active = Some(request.generation);
            }
        }
    }

    fn jump_to(&mut self, position_px: f32) {
        self.position = position_px;
        self.target = position_px;
        self.velocity = 0.0;
        self.active = None;
        self.finished = None;
        self.last_tick = None;
    }

    fn rescale(&mut self, factor: f32) {
        self.position *= factor;
        self.target *= factor;
        self.velocity *= factor;
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn is_animating(&self) -> bool {
        self.active.is_some() || self.finished.is_some()
    }

    fn poll(&mut self, now: Instant) -> Option<Generation> {
        if let Some(generation) = self.finished.take() {
            return Some(generation);
        }
        let generation = self.active?;

        let last = *self.last_tick.get_or_insert(now);
        let elapsed_micros = now.checked_duration_since(last)?.as_micros();
        let steps = elapsed_micros / SPRING_STEP_MICROS;
        if steps > MAX_STEPS_PER_POLL {
            self.last_tick = Some(now);
        } else {
            self.last_tick = Some(last + Duration::from_micros(steps * SPRING_STEP_MICROS));
        }

        let dt = SPRING_STEP_MICROS as f32 / 1_000_000.0;
        for _ in 0..steps.min(MAX_STEPS_PER_POLL) {
            self.step(dt);
            if self.at_rest() {
                break;
            }
        }

        if self.at_rest() {
            self.position = self.target;
            self.velocity = 0.0;
            self.active = None;
            self.last_tick = None;
            return Some(generation);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spring_to(target_px: f32, generation: u32) -> AnimationRequest {
        AnimationRequest {
            target_px,
            timing: Timing::Spring(SpringConfig::PAGE),
            generation: Generation(generation),
            initial_velocity: None,
        }
    }

    /// Poll every 16ms until a completion or `limit_ms`.
    fn run_until_complete(
        driver: &mut SpringDriver,
        start_ms: u64,
        limit_ms: u64,
    ) -> Option<(Generation, u64)> {
        let mut ms = start_ms;
        while ms <= start_ms + limit_ms {
            if let Some(generation) = driver.poll(Instant::from_millis(ms)) {
                return Some((generation, ms));
            }
            ms += 16;
        }
        None
    }

    #[test]
    fn test_spring_settles_on_target_once() {
        let mut driver = SpringDriver::new();
        driver.animate_to(spring_to(-284.0, 1));
        assert!(driver.is_animating());

        let (generation, _) =
            run_until_complete(&mut driver, 0, 2000).expect("spring should settle");
        assert_eq!(generation, Generation(1));
        assert_eq!(driver.position(), -284.0);
        assert!(!driver.is_animating());

        assert_eq!(run_until_complete(&mut driver, 2000, 500), None);
    }

    #[test]
    fn test_spring_moves_gradually() {
        let mut driver = SpringDriver::new();
        driver.animate_to(spring_to(-300.0, 1));
        driver.poll(Instant::from_millis(0));
        driver.poll(Instant::from_millis(48));

        let position = driver.position();
        assert!(position < 0.0 && position > -300.0, "got {position}");
    }

    #[test]
    fn test_retarget_supersedes_generation() {
        let mut driver = SpringDriver::new();
        driver.animate_to(spring_to(-900.0, 1));
        driver.poll(Instant::from_millis(0));
        driver.poll(Instant::from_millis(32));

        driver.animate_to(spring_to(-300.0, 2));
        let (generation, _) =
            run_until_complete(&mut driver, 48, 3000).expect("spring should settle");
        assert_eq!(generation, Generation(2));
        assert_eq!(driver.position(), -300.0);
    }

    #[test]
    fn test_immediate_completes_on_next_poll() {
        let mut driver = SpringDriver::new();
        driver.jump_to(-1420.0);
        driver.animate_to(AnimationRequest {
            target_px: 0.0,
            timing: Timing::Immediate,
            generation: Generation(7),
            initial_velocity: None,
        });

        assert_eq!(driver.position(), 0.0);
        assert_eq!(driver.poll(Instant::from_millis(5)), Some(Generation(7)));
        assert_eq!(driver.poll(Instant::from_millis(10)), None);
    }

    #[test]
    fn test_jump_cancels_without_completion() {
        let mut driver = SpringDriver::new();
        driver.animate_to(spring_to(-300.0, 1));
        driver.poll(Instant::from_millis(0));
        driver.jump_to(-40.0);

        assert!(!driver.is_animating());
        assert_eq!(driver.poll(Instant::from_millis(500)), None);
        assert_eq!(driver.position(), -40.0);
    }

    #[test]
    fn test_rescale_keeps_relative_progress() {
        let mut driver = SpringDriver::new();
        driver.jump_to(-100.0);
        driver.animate_to(spring_to(-200.0, 1));
        driver.rescale(1.5);

        assert_eq!(driver.position(), -150.0);
        assert_eq!(driver.target(), -300.0);
    }

    #[test]
    fn test_release_velocity_carries_into_spring() {
        let mut driver = SpringDriver::new();
        driver.animate_to(AnimationRequest {
            initial_velocity: Some(-2000.0),
            ..spring_to(-284.0, 3)
        });
        driver.poll(Instant::from_millis(0));
        driver.poll(Instant::from_millis(8));

        // The fling moves it further than the same spring from rest
        let mut resting = SpringDriver::new();
        resting.animate_to(spring_to(-284.0, 3));
        resting.poll(Instant::from_millis(0));
        resting.poll(Instant::from_millis(8));

        assert!(driver.position() < resting.position());
    }

    #[test]
    fn test_generation_increments() {
        assert_eq!(Generation(4).next(), Generation(5));
        assert_eq!(Generation(u32::MAX).next(), Generation(0));
    }
}
