//! Play/pause and stop controls

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::Result,
    state::{CountdownWidget, TimerState},
};

/// A control the user can press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    PlayPause,
    Stop,
}

impl FromStr for Control {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "p" | "play" | "pause" | "toggle" => Ok(Control::PlayPause),
            "s" | "stop" => Ok(Control::Stop),
            other => Err(format!("Unknown control: {}", other)),
        }
    }
}

/// Icon shown on the play/pause toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayPauseIcon {
    Play,
    Pause,
}

impl PlayPauseIcon {
    pub fn label(self) -> &'static str {
        match self {
            PlayPauseIcon::Play => "Play",
            PlayPauseIcon::Pause => "Pause",
        }
    }
}

impl fmt::Display for PlayPauseIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The toggle offers to pause while running and to play otherwise
pub fn play_pause_icon(state: &TimerState) -> PlayPauseIcon {
    if state.is_running() {
        PlayPauseIcon::Pause
    } else {
        PlayPauseIcon::Play
    }
}

/// Stop is disabled exactly when the timer is already idle at full duration
pub fn stop_disabled(state: &TimerState) -> bool {
    state.is_at_rest()
}

/// Routes control presses to a mounted widget
pub struct ControlSurface;

impl ControlSurface {
    /// Apply a press and return the resulting state.
    ///
    /// Pressing a disabled stop does nothing.
    pub fn press(widget: &CountdownWidget, control: Control) -> Result<TimerState> {
        match control {
            Control::PlayPause => {
                let state = widget.toggle()?;
                info!("Play/pause pressed, now showing {}", play_pause_icon(&state));
                Ok(state)
            }
            Control::Stop => {
                let current = widget.state()?;
                if stop_disabled(&current) {
                    debug!("Stop pressed while disabled, ignoring");
                    return Ok(current);
                }
                widget.stop()
            }
        }
    }
}
