//! Countdown Ring - a circular countdown timer widget
//!
//! This library provides the countdown state machine, its tick source and
//! completion queue, the ring renderer and the play/pause/stop controls.

pub mod config;
pub mod controls;
pub mod error;
pub mod render;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use controls::{Control, ControlSurface, WidgetSnapshot};
pub use error::{Error, Result};
pub use render::{format_time, render_svg, RingGeometry, RingStyle};
pub use state::{CountdownWidget, TimerOptions, TimerState};
pub use utils::signals::shutdown_signal;
