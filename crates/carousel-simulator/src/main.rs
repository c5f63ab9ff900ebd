//! Desktop simulator for the carousel widget.
//!
//! Renders the carousel track and indicator strip in an SDL2 window via
//! `embedded-graphics-simulator`. The mouse stands in for the touch panel:
//! press, drag and release on the track to swipe, click a pill to select.
//!
//! # Key bindings
//!
//! | Key     | Action                        |
//! |---------|-------------------------------|
//! | ← / →   | Swipe to previous / next item |
//! | 1-5     | Select item                   |
//! | A       | Toggle autoplay               |
//! | [ / ]   | Autoplay delay -/+ 500 ms     |
//! | H       | Toggle pause-on-hover         |
//! | L       | Toggle loop                   |
//! | - / =   | Shrink / grow the container   |
//! | Q       | Quit                          |

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info};

use carousel_core::ui::IndicatorStrip;
use carousel_core::ui::core::{
    Action, Drawable as WidgetDrawable, TouchEvent, TouchPoint, TouchResult, Touchable,
};
use carousel_core::{Carousel, CarouselConfig, CarouselEvent, DragEnd, SpringDriver, default_items};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

const DISPLAY_WIDTH_PX: u32 = 320;
const DISPLAY_HEIGHT_PX: u32 = 240;

/// Height of the indicator strip below the track
const INDICATOR_HEIGHT_PX: u32 = 32;

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~60 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Container width change per key press
const RESIZE_STEP_PX: u32 = 20;

/// Narrowest container the resize keys allow
const MIN_CONTAINER_WIDTH_PX: u32 = 80;

/// Autoplay delay change per key press
const DELAY_STEP_MS: u32 = 500;

// ---------------------------------------------------------------------------
// Layout helpers
// ---------------------------------------------------------------------------

fn track_bounds(width: u32) -> Rectangle {
    let left = (DISPLAY_WIDTH_PX.saturating_sub(width) / 2) as i32;
    Rectangle::new(
        Point::new(left, 0),
        Size::new(width, DISPLAY_HEIGHT_PX - INDICATOR_HEIGHT_PX),
    )
}

fn indicator_bounds(width: u32) -> Rectangle {
    let track = track_bounds(width);
    Rectangle::new(
        Point::new(track.top_left.x, track.size.height as i32),
        Size::new(width, INDICATOR_HEIGHT_PX),
    )
}

fn touch_point(point: Point) -> TouchPoint {
    TouchPoint::new(point.x.max(0) as u16, point.y.max(0) as u16)
}

fn log_events(carousel: &mut Carousel) {
    while let Some(event) = carousel.pop_event() {
        match event {
            CarouselEvent::ActiveIndexChanged { index } => {
                info!("Active index -> {}", index)
            }
            CarouselEvent::GestureClassified(intent) => info!("Gesture -> {:?}", intent),
        }
    }
}

/// Drive a keyboard "swipe" through the same path as a released drag.
fn keyboard_swipe(carousel: &mut Carousel, forward: bool, now: Instant) {
    let width = carousel.geometry().item_width();
    let offset_x = if forward { -width } else { width };
    carousel.release_drag(
        DragEnd {
            offset_x,
            velocity_x: 0.0,
        },
        now,
    );
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting carousel simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: ←/→ swipe  1-5 select  A autoplay  [/] delay  H hover-pause  L loop  -/= resize  Q quit");

    let items = default_items();
    let config = CarouselConfig::default()
        .with_autoplay(3000)
        .with_pause_on_hover(true)
        .with_loop(true);

    let mut carousel = match Carousel::new(config, items.len(), SpringDriver::new()) {
        Ok(carousel) => carousel,
        Err(e) => {
            error!("Failed to build carousel: {}", e);
            return;
        }
    };

    let mut container_width = DISPLAY_WIDTH_PX;
    carousel.mount(Some(container_width), Instant::now());

    let mut strip = IndicatorStrip::new(indicator_bounds(container_width), items.len())
        .with_palette(carousel.palette());

    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Carousel Simulator", &output_settings);

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = display.clear(carousel.palette().background);
    window.update(&display);

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            let now = Instant::now();
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::Right => keyboard_swipe(&mut carousel, true, now),
                    Keycode::Left => keyboard_swipe(&mut carousel, false, now),
                    Keycode::Num1 => carousel.select(0),
                    Keycode::Num2 => carousel.select(1),
                    Keycode::Num3 => carousel.select(2),
                    Keycode::Num4 => carousel.select(3),
                    Keycode::Num5 => carousel.select(4),
                    Keycode::A => {
                        let enabled = !carousel.config().autoplay;
                        info!("Autoplay {}", if enabled { "on" } else { "off" });
                        carousel.set_autoplay(enabled, now);
                    }
                    Keycode::LeftBracket | Keycode::RightBracket => {
                        let delay = carousel.config().autoplay_delay_ms;
                        let delay = if keycode == Keycode::LeftBracket {
                            delay.saturating_sub(DELAY_STEP_MS)
                        } else {
                            delay + DELAY_STEP_MS
                        };
                        carousel.set_autoplay_delay(delay, now);
                        info!("Autoplay delay {}ms", carousel.config().autoplay_delay_ms);
                    }
                    Keycode::H => {
                        let pause = !carousel.config().pause_on_hover;
                        info!("Pause on hover {}", if pause { "on" } else { "off" });
                        carousel.set_pause_on_hover(pause, now);
                    }
                    Keycode::L => {
                        let looping = !carousel.config().loop_items;
                        info!("Loop {}", if looping { "on" } else { "off" });
                        carousel.set_loop(looping, now);
                    }
                    Keycode::Minus | Keycode::Equals => {
                        container_width = if keycode == Keycode::Minus {
                            container_width
                                .saturating_sub(RESIZE_STEP_PX)
                                .max(MIN_CONTAINER_WIDTH_PX)
                        } else {
                            (container_width + RESIZE_STEP_PX).min(DISPLAY_WIDTH_PX)
                        };
                        info!("Container width {}px", container_width);
                        carousel.resize(container_width);
                        strip.set_bounds(indicator_bounds(container_width));
                    }
                    _ => {}
                },

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    let touch = touch_point(point);
                    if strip.contains_point(touch) {
                        if let TouchResult::Action(Action::Select(index)) =
                            strip.handle_touch(TouchEvent::Press(touch))
                        {
                            info!("Indicator tap -> select {}", index);
                            carousel.select(index);
                        }
                    } else if track_bounds(container_width).contains(point) {
                        carousel.handle_touch(TouchEvent::Press(touch), now);
                    }
                }

                SimulatorEvent::MouseMove { point } => {
                    let inside = track_bounds(container_width).contains(point)
                        || indicator_bounds(container_width).contains(point);
                    if inside {
                        carousel.pointer_enter(now);
                    } else {
                        carousel.pointer_leave(now);
                    }
                    if carousel.is_dragging() {
                        carousel.handle_touch(TouchEvent::Drag(touch_point(point)), now);
                    }
                }

                SimulatorEvent::MouseButtonUp { point, .. } => {
                    if carousel.is_dragging() {
                        carousel.handle_touch(TouchEvent::Release(touch_point(point)), now);
                    }
                }

                _ => {}
            }
        }

        // --- Carousel tick ------------------------------------------------
        carousel.tick(Instant::now());
        log_events(&mut carousel);
        strip.set_active_index(carousel.active_index());

        // --- Render -------------------------------------------------------
        let palette = carousel.palette();
        let bounds = track_bounds(container_width);
        let _ = display.clear(palette.background);

        let _ = bounds
            .into_styled(PrimitiveStyle::with_stroke(palette.border, 1))
            .draw(&mut display);
        if let Err(e) = carousel.track_view(&items, bounds).draw(&mut display) {
            error!("Track draw error: {:?}", e);
        }
        if let Err(e) = WidgetDrawable::draw(&strip, &mut display) {
            error!("Indicator draw error: {:?}", e);
        }
        strip.mark_clean();

        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            let remaining = FRAME_DURATION - elapsed;
            std::thread::sleep(std::time::Duration::from_micros(remaining.as_micros()));
        }
    }

    carousel.unmount();
    info!("Simulator exiting");
}
