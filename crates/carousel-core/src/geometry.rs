//! Item width, stride, and track position math

use crate::constants::{CONTAINER_PADDING_PX, DRAG_ELASTIC, GAP_PX, MAX_ROTATION_DEG};

/// Resolves per-item geometry from the container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    base_width_px: u32,
    padding_px: f32,
    gap_px: f32,
    item_width_px: f32,
}

impl Geometry {
    /// Create a resolver sized from `base_width_px` until measured.
    pub fn new(base_width_px: u32) -> Self {
        let mut geometry = Self {
            base_width_px,
            padding_px: CONTAINER_PADDING_PX,
            gap_px: GAP_PX,
            item_width_px: 0.0,
        };
        geometry.resize(base_width_px);
        geometry
    }

    /// Resolve the mount-time width.
    ///
    /// An unattached or zero-width container falls back to the base width.
    pub fn mount(&mut self, measured_width_px: Option<u32>) -> f32 {
        let width = measured_width_px
            .filter(|&w| w > 0)
            .unwrap_or(self.base_width_px);
        self.resize(width)
    }

    /// Recompute the item width for a new container width.
    pub fn resize(&mut self, container_width_px: u32) -> f32 {
        self.item_width_px = (container_width_px as f32 - 2.0 * self.padding_px).max(0.0);
        self.item_width_px
    }

    pub fn item_width(&self) -> f32 {
        self.item_width_px
    }

    pub fn padding(&self) -> f32 {
        self.padding_px
    }

    /// Distance between the starts of consecutive items.
    pub fn stride(&self) -> f32 {
        self.item_width_px + self.gap_px
    }

    /// Resting track position for a display index.
    pub fn position_for(&self, index: usize) -> f32 {
        -(index as f32 * self.stride())
    }

    /// Horizontal perspective origin centred on the active item.
    pub fn perspective_origin_x(&self, index: usize) -> f32 {
        index as f32 * self.stride() + self.item_width_px / 2.0
    }

    /// Track travel allowed while dragging without looping: `(min, max)`.
    pub fn drag_bounds(&self, display_len: usize) -> (f32, f32) {
        (-(display_len.saturating_sub(1) as f32) * self.stride(), 0.0)
    }

    /// Apply elastic resistance to a raw drag position outside `bounds`.
    pub fn constrain_drag(&self, position: f32, bounds: (f32, f32)) -> f32 {
        let (min, max) = bounds;
        if position < min {
            min + (position - min) * DRAG_ELASTIC
        } else if position > max {
            max + (position - max) * DRAG_ELASTIC
        } else {
            position
        }
    }
}

/// Y-axis rotation for the item at `item_index` given the track position.
///
/// Linear across one stride either side of the item's resting position
/// (+90 one stride left, -90 one stride right) and clamped beyond it.
pub fn rotation_deg(position_px: f32, item_index: usize, stride_px: f32) -> f32 {
    if stride_px <= 0.0 {
        return 0.0;
    }
    let offset = (position_px + item_index as f32 * stride_px) / stride_px;
    (-MAX_ROTATION_DEG * offset).clamp(-MAX_ROTATION_DEG, MAX_ROTATION_DEG)
}
