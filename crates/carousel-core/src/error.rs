//! Error types for carousel construction and configuration

use thiserror_no_std::Error;

/// Errors surfaced while building a carousel.
///
/// Runtime inputs (stale completions, out-of-range selection) never produce
/// an error; they are resolved inside the navigation state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CarouselError {
    /// The logical item sequence was empty
    #[error("Carousel requires at least one item")]
    EmptyItems,

    /// A serialized configuration could not be decoded
    #[error("Invalid carousel configuration: {reason}")]
    InvalidConfig {
        /// Decoder failure description
        reason: &'static str,
    },
}

/// Result type for carousel operations
pub type CarouselResult<T> = Result<T, CarouselError>;
