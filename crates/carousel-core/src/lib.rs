//! Hardware-independent core library for the carousel widget
//!
//! This crate contains the platform-agnostic logic of a gesture-driven,
//! paged carousel: item geometry, swipe classification, the autoplay timer,
//! the navigation state machine with seamless forward looping, the spring
//! transition driver, and the embedded-graphics views that draw the track
//! and its indicator pills.
//!
//! Nothing here reads a clock. Every input carries an
//! [`embassy_time::Instant`], so the same code runs on embedded targets and
//! on desktop hosts (the simulator and tests).

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod autoplay;
pub mod carousel;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod navigation;
pub mod sequence;
pub mod transition;
pub mod ui;

pub use carousel::{Carousel, CarouselEvent};
pub use config::CarouselConfig;
pub use error::{CarouselError, CarouselResult};
pub use gesture::{DragEnd, SwipeIntent};
pub use sequence::{CarouselItem, DisplaySequence, Slot, default_items};
pub use transition::{SpringDriver, TransitionDriver};
