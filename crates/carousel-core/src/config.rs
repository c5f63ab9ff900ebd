//! Carousel configuration
//!
//! Every option is optional with a default matching the stock widget. The
//! struct is serde-serializable so firmware can ship it as a postcard blob.

use alloc::vec::Vec;
use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUTOPLAY_DELAY_MS, DEFAULT_BASE_WIDTH_PX, MIN_AUTOPLAY_DELAY_MS};
use crate::error::{CarouselError, CarouselResult};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselConfig {
    /// Container width used until the first measurement arrives
    pub base_width_px: u32,
    /// Advance automatically every `autoplay_delay_ms`
    pub autoplay: bool,
    pub autoplay_delay_ms: u32,
    /// Suspend autoplay while the pointer is over the container
    pub pause_on_hover: bool,
    /// Wrap from the last item back to the first
    pub loop_items: bool,
    /// Circular presentation; ignored by the navigation core
    pub round: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            base_width_px: DEFAULT_BASE_WIDTH_PX,
            autoplay: false,
            autoplay_delay_ms: DEFAULT_AUTOPLAY_DELAY_MS,
            pause_on_hover: false,
            loop_items: false,
            round: false,
        }
    }
}

impl CarouselConfig {
    pub fn with_base_width(mut self, width_px: u32) -> Self {
        self.base_width_px = width_px;
        self
    }

    pub fn with_autoplay(mut self, delay_ms: u32) -> Self {
        self.autoplay = true;
        self.autoplay_delay_ms = delay_ms;
        self
    }

    pub fn with_pause_on_hover(mut self, pause: bool) -> Self {
        self.pause_on_hover = pause;
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.loop_items = looping;
        self
    }

    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Clamp values the navigation core cannot honour.
    ///
    /// The autoplay period must stay longer than the wrap reset delay or a
    /// tick could land inside a wrap.
    pub fn validated(mut self) -> Self {
        if self.autoplay_delay_ms < MIN_AUTOPLAY_DELAY_MS {
            log::debug!(
                "Autoplay delay {}ms below minimum, clamping to {}ms",
                self.autoplay_delay_ms,
                MIN_AUTOPLAY_DELAY_MS
            );
            self.autoplay_delay_ms = MIN_AUTOPLAY_DELAY_MS;
        }
        self
    }

    /// Autoplay period as a [`Duration`].
    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay_ms as u64)
    }

    /// Decode a configuration from postcard bytes and validate it.
    pub fn from_postcard(bytes: &[u8]) -> CarouselResult<Self> {
        postcard::from_bytes::<Self>(bytes)
            .map(Self::validated)
            .map_err(|_| CarouselError::InvalidConfig {
                reason: "postcard decode failed",
            })
    }

    /// Encode this configuration as postcard bytes.
    pub fn to_postcard(&self) -> CarouselResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|_| CarouselError::InvalidConfig {
            reason: "postcard encode failed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_widget() {
        let config = CarouselConfig::default();
        assert_eq!(config.base_width_px, 300);
        assert!(!config.autoplay);
        assert_eq!(config.autoplay_delay_ms, 3000);
        assert!(!config.pause_on_hover);
        assert!(!config.loop_items);
        assert!(!config.round);
    }

    #[test]
    fn test_validated_clamps_short_autoplay_delay() {
        let config = CarouselConfig::default().with_autoplay(10).validated();
        assert_eq!(config.autoplay_delay_ms, MIN_AUTOPLAY_DELAY_MS);

        let config = CarouselConfig::default().with_autoplay(2500).validated();
        assert_eq!(config.autoplay_delay_ms, 2500);
    }

    #[test]
    fn test_postcard_blob_decodes() {
        let config = CarouselConfig::default()
            .with_autoplay(1500)
            .with_loop(true)
            .with_pause_on_hover(true);
        let bytes = config.to_postcard().unwrap();

        assert_eq!(CarouselConfig::from_postcard(&bytes), Ok(config));
    }

    #[test]
    fn test_truncated_blob_is_rejected() {
        let bytes = CarouselConfig::default().to_postcard().unwrap();
        let result = CarouselConfig::from_postcard(&bytes[..2]);

        assert!(matches!(result, Err(CarouselError::InvalidConfig { .. })));
    }
}
