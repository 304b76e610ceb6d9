//! State management module
//!
//! This module contains the countdown state machine and the mounted widget that drives it.

pub mod timer_state;
pub mod widget;

// Re-export main types
pub use timer_state::{DurationChangePolicy, Phase, TickGranularity, TimerEvent, TimerOptions, TimerState};
pub use widget::CountdownWidget;
