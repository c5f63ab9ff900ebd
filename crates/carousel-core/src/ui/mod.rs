//! Views for the carousel track and its indicator strip

pub mod colors;
pub mod core;
pub mod indicator;
pub mod track;

pub use colors::CarouselPalette;
pub use indicator::IndicatorStrip;
pub use track::TrackView;
