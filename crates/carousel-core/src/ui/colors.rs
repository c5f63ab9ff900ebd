//! Carousel color palette
//!
//! RGB565 format. To convert from 8-bit RGB: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;

/// Screen background - near black violet (#060010)
pub const COLOR_BACKGROUND: Rgb565 = Rgb565::new(6 >> 3, 0, 16 >> 3);

/// Card surface and container border (#222222)
pub const COLOR_SURFACE: Rgb565 = Rgb565::new(34 >> 3, 34 >> 2, 34 >> 3);

/// Pure white - maximum brightness in RGB565
pub const WHITE: Rgb565 = Rgb565::new(31, 63, 31);

/// Active indicator - white at roughly 90% over the background
pub const INDICATOR_ACTIVE: Rgb565 = Rgb565::new(28, 57, 28);

/// Inactive indicator - white at roughly 30% over the background
pub const INDICATOR_INACTIVE: Rgb565 = Rgb565::new(10, 19, 10);

/// Colors used by the track and indicator views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselPalette {
    pub background: Rgb565,
    pub card: Rgb565,
    pub border: Rgb565,
    pub text: Rgb565,
    pub indicator_active: Rgb565,
    pub indicator_inactive: Rgb565,
}

impl Default for CarouselPalette {
    fn default() -> Self {
        Self::square()
    }
}

impl CarouselPalette {
    /// Rounded-rectangle cards on a dark border
    pub fn square() -> Self {
        Self {
            background: COLOR_BACKGROUND,
            card: COLOR_SURFACE,
            border: COLOR_SURFACE,
            text: WHITE,
            indicator_active: INDICATOR_ACTIVE,
            indicator_inactive: INDICATOR_INACTIVE,
        }
    }

    /// Circular cards inside a white ring
    pub fn round() -> Self {
        Self {
            card: COLOR_BACKGROUND,
            border: WHITE,
            ..Self::square()
        }
    }
}
