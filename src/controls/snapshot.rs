//! Serializable view of a widget

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::buttons::{play_pause_icon, stop_disabled, PlayPauseIcon};
use crate::{
    render::{readout, RingFrame, RingGeometry},
    state::{Phase, TimerState},
};

/// Everything a host needs to draw the widget for one state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub phase: Phase,
    pub configured_secs: u64,
    pub remaining_secs: f64,
    pub running: bool,
    pub overtime: bool,
    pub progress_fraction: f64,
    pub overtime_fraction: Option<f64>,
    pub frame: RingFrame,
    pub readout: String,
    pub play_pause: PlayPauseIcon,
    pub stop_disabled: bool,
    pub taken_at: DateTime<Utc>,
}

impl WidgetSnapshot {
    pub fn new(geometry: &RingGeometry, state: &TimerState) -> Self {
        Self {
            phase: state.phase(),
            configured_secs: state.configured_secs(),
            remaining_secs: state.remaining_secs(),
            running: state.is_running(),
            overtime: state.is_overtime(),
            progress_fraction: state.progress_fraction(),
            overtime_fraction: state.overtime_fraction(),
            frame: RingFrame::from_state(geometry, state),
            readout: readout(state),
            play_pause: play_pause_icon(state),
            stop_disabled: stop_disabled(state),
            taken_at: Utc::now(),
        }
    }
}
