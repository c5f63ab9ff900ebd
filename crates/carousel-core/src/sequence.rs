//! Logical items and the display sequence laid out on the track
//!
//! When looping is enabled the track carries one extra slot after the last
//! real item: a clone of item 0. Animating onto that clone and then snapping
//! back to the real item 0 is what makes forward wrapping seamless.

use alloc::vec::Vec;
use heapless::String;

/// Maximum title length in bytes
pub const MAX_TITLE_LEN: usize = 32;

/// Maximum description length in bytes
pub const MAX_DESCRIPTION_LEN: usize = 64;

/// Display payload for one carousel page.
///
/// The navigation core only ever looks at how many items exist; the payload
/// belongs to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselItem {
    pub id: u32,
    pub title: String<MAX_TITLE_LEN>,
    pub description: String<MAX_DESCRIPTION_LEN>,
}

impl CarouselItem {
    /// Create an item, truncating text that exceeds the fixed capacities.
    pub fn new(id: u32, title: &str, description: &str) -> Self {
        Self {
            id,
            title: truncated(title),
            description: truncated(description),
        }
    }
}

fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// The built-in sample set shown when the caller supplies no items.
pub fn default_items() -> Vec<CarouselItem> {
    alloc::vec![
        CarouselItem::new(1, "Text Animations", "Cool text animations for your projects."),
        CarouselItem::new(2, "Animations", "Smooth animations for your projects."),
        CarouselItem::new(3, "Components", "Reusable components for your projects."),
        CarouselItem::new(
            4,
            "Backgrounds",
            "Beautiful backgrounds and patterns for your projects.",
        ),
        CarouselItem::new(5, "Common UI", "Common UI components are coming soon!"),
    ]
}

/// What occupies a position on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// A caller item at its logical index
    Real(usize),
    /// The clone of item 0 appended after the last real item
    SentinelClone,
}

impl Slot {
    /// Logical item rendered in this slot.
    pub fn item_index(self) -> usize {
        match self {
            Slot::Real(index) => index,
            Slot::SentinelClone => 0,
        }
    }
}

/// Positions laid out on the track for a given item count and loop mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySequence {
    logical_len: usize,
    looping: bool,
}

impl DisplaySequence {
    pub fn new(logical_len: usize, looping: bool) -> Self {
        Self {
            logical_len,
            looping,
        }
    }

    /// Number of caller items (N).
    pub fn logical_len(&self) -> usize {
        self.logical_len
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Number of track positions: N, or N + 1 when looping.
    pub fn len(&self) -> usize {
        if self.looping {
            self.logical_len + 1
        } else {
            self.logical_len
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Highest valid active index.
    pub fn last_index(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Index of the last real item (N - 1).
    pub fn last_real_index(&self) -> usize {
        self.logical_len.saturating_sub(1)
    }

    /// Track position of the sentinel clone, if looping.
    pub fn sentinel_index(&self) -> Option<usize> {
        self.looping.then_some(self.logical_len)
    }

    pub fn is_sentinel(&self, index: usize) -> bool {
        self.sentinel_index() == Some(index)
    }

    /// Resolve a track position to its slot.
    pub fn slot(&self, index: usize) -> Option<Slot> {
        if index < self.logical_len {
            Some(Slot::Real(index))
        } else if self.is_sentinel(index) {
            Some(Slot::SentinelClone)
        } else {
            None
        }
    }

    /// Iterate every slot in track order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        (0..self.len()).filter_map(move |index| self.slot(index))
    }

    /// Indicator that should be lit for a track position.
    ///
    /// Uses the logical length so the sentinel lights indicator 0.
    pub fn indicator_index(&self, index: usize) -> usize {
        if self.logical_len == 0 {
            0
        } else {
            index % self.logical_len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_len_adds_sentinel_only_when_looping() {
        assert_eq!(DisplaySequence::new(5, false).len(), 5);
        assert_eq!(DisplaySequence::new(5, true).len(), 6);
        assert_eq!(DisplaySequence::new(1, true).len(), 2);
    }

    #[test]
    fn test_slot_resolution() {
        let seq = DisplaySequence::new(3, true);
        assert_eq!(seq.slot(0), Some(Slot::Real(0)));
        assert_eq!(seq.slot(2), Some(Slot::Real(2)));
        assert_eq!(seq.slot(3), Some(Slot::SentinelClone));
        assert_eq!(seq.slot(4), None);

        let flat = DisplaySequence::new(3, false);
        assert_eq!(flat.slot(3), None);
        assert_eq!(flat.sentinel_index(), None);
    }

    #[test]
    fn test_sentinel_renders_first_item() {
        let seq = DisplaySequence::new(4, true);
        let rendered: Vec<usize> = seq.slots().map(Slot::item_index).collect();
        assert_eq!(rendered, alloc::vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_sentinel_maps_to_first_indicator() {
        let seq = DisplaySequence::new(5, true);
        assert_eq!(seq.indicator_index(5), 0, "5 mod 5 must light indicator 0");
        assert_eq!(seq.indicator_index(3), 3);
    }

    #[test]
    fn test_default_items() {
        let items = default_items();
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].title.as_str(), "Text Animations");
        assert_eq!(items[4].id, 5);
    }

    #[test]
    fn test_item_text_is_truncated_to_capacity() {
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        let item = CarouselItem::new(9, long, "short");
        assert_eq!(item.title.len(), MAX_TITLE_LEN);
        assert_eq!(item.description.as_str(), "short");
    }
}
