//! Rendering module
//!
//! Pure functions from timer state to ring geometry, SVG and readout text.

pub mod format;
pub mod ring;

// Re-export main items
pub use format::{format_time, readout};
pub use ring::{render_svg, RingFrame, RingGeometry, RingStyle};
