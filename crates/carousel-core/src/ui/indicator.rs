//! Indicator pills below the track
//!
//! One pill per logical item. The active pill is stretched; tapping a pill
//! requests an explicit selection of that item. The active pill is derived
//! from the active index modulo the logical item count, so the sentinel
//! clone lights the first pill.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, RoundedRectangle};

use crate::ui::colors::CarouselPalette;
use crate::ui::core::{Action, Drawable, TouchEvent, TouchPoint, TouchResult, Touchable};

/// Width of the active pill in pixels
pub const ACTIVE_PILL_WIDTH_PX: u32 = 32;

/// Width (and height) of an inactive pill in pixels
pub const PILL_SIZE_PX: u32 = 8;

/// Gap between pills in pixels
pub const PILL_GAP_PX: u32 = 8;

/// Row of indicator pills.
#[derive(Debug, Clone)]
pub struct IndicatorStrip {
    bounds: Rectangle,
    count: usize,
    active: usize,
    palette: CarouselPalette,
    dirty: bool,
}

impl IndicatorStrip {
    pub fn new(bounds: Rectangle, count: usize) -> Self {
        Self {
            bounds,
            count,
            active: 0,
            palette: CarouselPalette::default(),
            dirty: true,
        }
    }

    pub fn with_palette(mut self, palette: CarouselPalette) -> Self {
        self.palette = palette;
        self.dirty = true;
        self
    }

    pub fn set_bounds(&mut self, bounds: Rectangle) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.dirty = true;
        }
    }

    /// Light the pill for a display index (taken modulo the pill count).
    pub fn set_active_index(&mut self, index: usize) {
        let active = if self.count == 0 { 0 } else { index % self.count };
        if self.active != active {
            self.active = active;
            self.dirty = true;
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn pill_width(&self, index: usize) -> u32 {
        if index == self.active {
            ACTIVE_PILL_WIDTH_PX
        } else {
            PILL_SIZE_PX
        }
    }

    fn row_width(&self) -> u32 {
        if self.count == 0 {
            return 0;
        }
        ACTIVE_PILL_WIDTH_PX
            + (self.count as u32 - 1) * PILL_SIZE_PX
            + (self.count as u32 - 1) * PILL_GAP_PX
    }

    /// Bounds of pill `index`, centred in the strip.
    pub fn pill_bounds(&self, index: usize) -> Option<Rectangle> {
        if index >= self.count {
            return None;
        }
        let start_x =
            self.bounds.top_left.x + (self.bounds.size.width as i32 - self.row_width() as i32) / 2;
        let y = self.bounds.top_left.y
            + (self.bounds.size.height as i32 - PILL_SIZE_PX as i32) / 2;

        let x = (0..index).fold(start_x, |x, i| x + (self.pill_width(i) + PILL_GAP_PX) as i32);
        Some(Rectangle::new(
            Point::new(x, y),
            Size::new(self.pill_width(index), PILL_SIZE_PX),
        ))
    }

    /// Pill under `point`, using the full strip height and half the gap on
    /// either side as the hit area.
    pub fn indicator_at(&self, point: TouchPoint) -> Option<usize> {
        let p = point.to_point();
        if !self.bounds.contains(p) {
            return None;
        }
        let slop = (PILL_GAP_PX / 2) as i32;
        (0..self.count).find(|&i| {
            self.pill_bounds(i).is_some_and(|pill| {
                p.x >= pill.top_left.x - slop
                    && p.x < pill.top_left.x + pill.size.width as i32 + slop
            })
        })
    }
}

impl Drawable for IndicatorStrip {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let radius = Size::new(PILL_SIZE_PX / 2, PILL_SIZE_PX / 2);
        for index in 0..self.count {
            let Some(pill) = self.pill_bounds(index) else {
                continue;
            };
            let color = if index == self.active {
                self.palette.indicator_active
            } else {
                self.palette.indicator_inactive
            };
            RoundedRectangle::with_equal_corners(pill, radius)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(display)?;
        }
        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Touchable for IndicatorStrip {
    fn contains_point(&self, point: TouchPoint) -> bool {
        self.bounds.contains(point.to_point())
    }

    fn handle_touch(&mut self, event: TouchEvent) -> TouchResult {
        match event {
            TouchEvent::Press(point) => match self.indicator_at(point) {
                Some(index) => TouchResult::Action(Action::Select(index)),
                None => TouchResult::NotHandled,
            },
            _ => TouchResult::NotHandled,
        }
    }
}
