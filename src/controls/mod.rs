//! Control surface module
//!
//! The play/pause toggle and stop button, and the serializable view a host renders them from.

pub mod buttons;
pub mod snapshot;

// Re-export main types
pub use buttons::{play_pause_icon, stop_disabled, Control, ControlSurface, PlayPauseIcon};
pub use snapshot::WidgetSnapshot;
