//! Track rendering: one card per display slot
//!
//! A frame-local view over the carousel state. Each card is offset by the
//! continuous track position and narrowed by its Y rotation to fake the
//! perspective turn of neighbouring cards.

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Ellipse, PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::geometry::{Geometry, rotation_deg};
use crate::sequence::{CarouselItem, DisplaySequence};
use crate::ui::colors::CarouselPalette;

/// Corner radius of square cards in pixels
const CARD_CORNER_RADIUS_PX: u32 = 12;

/// Inner padding of card text in pixels
const CARD_TEXT_INSET_PX: i32 = 20;

/// Cards narrower than this fraction of full width skip their text
const MIN_TEXT_SCALE: f32 = 0.6;

/// Height of one text line in pixels
const LINE_HEIGHT_PX: i32 = 12;

/// Cosine of an angle in degrees, for |deg| <= 90.
///
/// Taylor expansion to the sixth power; within 0.001 of the true value over
/// the range, clamped at zero.
pub fn cos_deg(deg: f32) -> f32 {
    let x = deg.clamp(-90.0, 90.0) * core::f32::consts::PI / 180.0;
    let x2 = x * x;
    let cos = 1.0 - x2 / 2.0 + x2 * x2 / 24.0 - x2 * x2 * x2 / 720.0;
    cos.clamp(0.0, 1.0)
}

/// Borrowed view of everything needed to draw one frame of the track.
pub struct TrackView<'a> {
    pub bounds: Rectangle,
    pub items: &'a [CarouselItem],
    pub sequence: DisplaySequence,
    pub geometry: Geometry,
    pub position_px: f32,
    pub round: bool,
    pub palette: CarouselPalette,
}

impl TrackView<'_> {
    /// Horizontal bounds of the card in display slot `index`, before rotation.
    pub fn card_bounds(&self, index: usize) -> Rectangle {
        let padding = self.geometry.padding() as i32;
        let item_width = self.geometry.item_width();
        let left = self.bounds.top_left.x as f32
            + padding as f32
            + self.position_px
            + index as f32 * self.geometry.stride();
        let height = if self.round {
            item_width as u32
        } else {
            (self.bounds.size.height as i32 - 2 * padding).max(0) as u32
        };
        Rectangle::new(
            Point::new(left as i32, self.bounds.top_left.y + padding),
            Size::new(item_width as u32, height),
        )
    }

    fn draw_card<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        index: usize,
        item: &CarouselItem,
    ) -> Result<(), D::Error> {
        let full = self.card_bounds(index);
        let rotation = rotation_deg(self.position_px, index, self.geometry.stride());
        let scale = cos_deg(rotation);
        let width = (full.size.width as f32 * scale) as u32;
        if width == 0 || full.size.height == 0 {
            return Ok(());
        }

        let card = Rectangle::with_center(full.center(), Size::new(width, full.size.height));
        let fill = PrimitiveStyle::with_fill(self.palette.card);
        if self.round {
            Ellipse::new(card.top_left, card.size)
                .into_styled(fill)
                .draw(display)?;
        } else {
            let radius = Size::new(CARD_CORNER_RADIUS_PX, CARD_CORNER_RADIUS_PX);
            RoundedRectangle::with_equal_corners(card, radius)
                .into_styled(fill)
                .draw(display)?;
        }

        if scale >= MIN_TEXT_SCALE {
            self.draw_text(display, card, item)?;
        }
        Ok(())
    }

    fn draw_text<D: DrawTarget<Color = Rgb565>>(
        &self,
        display: &mut D,
        card: Rectangle,
        item: &CarouselItem,
    ) -> Result<(), D::Error> {
        let text_width = card.size.width as i32 - 2 * CARD_TEXT_INSET_PX;
        if text_width < FONT_6X10.character_size.width as i32 {
            return Ok(());
        }
        let max_chars = (text_width / FONT_6X10.character_size.width as i32) as usize;

        let mut target = display.clipped(&card);
        let style = MonoTextStyle::new(&FONT_6X10, self.palette.text);
        let origin = card.top_left + Point::new(CARD_TEXT_INSET_PX, CARD_TEXT_INSET_PX);

        Text::with_baseline(&item.title, origin, style, Baseline::Top).draw(&mut target)?;

        let mut y = origin.y + 2 * LINE_HEIGHT_PX;
        for line in wrap_lines(&item.description, max_chars) {
            Text::with_baseline(line, Point::new(origin.x, y), style, Baseline::Top)
                .draw(&mut target)?;
            y += LINE_HEIGHT_PX;
        }
        Ok(())
    }
}

impl EgDrawable for TrackView<'_> {
    type Color = Rgb565;
    type Output = ();

    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let mut clipped = display.clipped(&self.bounds);
        let visible = self.bounds.size.width as i32;

        for (index, slot) in self.sequence.slots().enumerate() {
            let Some(item) = self.items.get(slot.item_index()) else {
                continue;
            };
            let card = self.card_bounds(index);
            let left = card.top_left.x - self.bounds.top_left.x;
            if left + card.size.width as i32 <= 0 || left >= visible {
                continue;
            }
            self.draw_card(&mut clipped, index, item)?;
        }
        Ok(())
    }
}

/// Greedy word wrap over `text` into lines of at most `max_chars`.
///
/// Words longer than a line are split.
pub fn wrap_lines(text: &str, max_chars: usize) -> impl Iterator<Item = &str> {
    let mut rest = text.trim();
    core::iter::from_fn(move || {
        if rest.is_empty() || max_chars == 0 {
            return None;
        }
        let split = match rest.char_indices().nth(max_chars) {
            None => rest.len(),
            // Include the boundary char so a space right at the limit counts
            Some((limit, ch)) => match rest[..limit + ch.len_utf8()].rfind(' ') {
                Some(space) if space > 0 => space,
                _ => limit,
            },
        };

        let (line, tail) = rest.split_at(split);
        rest = tail.trim_start();
        Some(line.trim_end())
    })
}
