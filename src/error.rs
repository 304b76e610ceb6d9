//! Error types for the countdown widget

use thiserror::Error;

/// Errors reported to the host of a countdown widget
#[derive(Debug, Error)]
pub enum Error {
    /// The ring cannot be inscribed: the stroke is at least as wide as the ring
    #[error("invalid ring geometry: size={size}, stroke_width={stroke_width} (stroke width must be positive and smaller than size)")]
    InvalidGeometry { size: f64, stroke_width: f64 },

    /// The timer state lock was poisoned by a panicking holder
    #[error("timer state unavailable: {0}")]
    StateUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
