//! Fixed tuning values shared by the carousel components

use embassy_time::Duration;

// ============================================================================
// Geometry
// ============================================================================

/// Horizontal gap between consecutive items in pixels
pub const GAP_PX: f32 = 16.0;

/// Padding between the container edge and the track on each side in pixels
pub const CONTAINER_PADDING_PX: f32 = 16.0;

/// Fallback container width used before the first measurement
pub const DEFAULT_BASE_WIDTH_PX: u32 = 300;

/// Fraction of out-of-bounds drag travel that still moves the track
pub const DRAG_ELASTIC: f32 = 0.2;

// ============================================================================
// Gestures
// ============================================================================

/// Fraction of the item width a drag must cover to change the page
pub const SWIPE_DISTANCE_RATIO: f32 = 0.25;

/// Release speed that changes the page regardless of distance (px/s)
pub const SWIPE_VELOCITY_THRESHOLD: f32 = 300.0;

/// Window of recent drag samples used to estimate release velocity
pub const VELOCITY_SAMPLE_WINDOW: Duration = Duration::from_millis(100);

/// Maximum number of drag samples retained for velocity estimation
pub const MAX_DRAG_SAMPLES: usize = 16;

// ============================================================================
// Timing
// ============================================================================

/// Default autoplay period in milliseconds
pub const DEFAULT_AUTOPLAY_DELAY_MS: u32 = 3000;

/// Smallest accepted autoplay period; must stay above [`RESET_DELAY`]
pub const MIN_AUTOPLAY_DELAY_MS: u32 = 100;

/// How long the resetting flag stays raised after a loop wrap
pub const RESET_DELAY: Duration = Duration::from_millis(50);

// ============================================================================
// Spring
// ============================================================================

/// Spring stiffness for page transitions
pub const SPRING_STIFFNESS: f32 = 400.0;

/// Spring damping for page transitions
pub const SPRING_DAMPING: f32 = 35.0;

/// Spring mass for page transitions
pub const SPRING_MASS: f32 = 1.0;

/// Distance to target under which the spring may come to rest (px)
pub const SPRING_REST_DELTA_PX: f32 = 0.5;

/// Speed under which the spring may come to rest (px/s)
pub const SPRING_REST_SPEED: f32 = 10.0;

/// Fixed integration step for the spring in microseconds
pub const SPRING_STEP_MICROS: u64 = 4_000;

// ============================================================================
// Presentation
// ============================================================================

/// Item rotation at one full stride away from the active slot (degrees)
pub const MAX_ROTATION_DEG: f32 = 90.0;

/// Capacity of the outward event queue
pub const EVENT_QUEUE_CAPACITY: usize = 16;
