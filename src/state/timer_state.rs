//! Timer state structure and the countdown state machine
//!
//! Every transition is a method on [`TimerState`] that mutates the value and
//! returns the event it produced, if any. Derived values (fractions, phase,
//! readout) are computed on demand and never stored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How much time one tick of the tick source represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickGranularity {
    /// One tick per second
    #[default]
    Second,
    /// One tick per 100ms
    Tenth,
}

impl TickGranularity {
    pub fn ticks_per_second(self) -> i64 {
        match self {
            TickGranularity::Second => 1,
            TickGranularity::Tenth => 10,
        }
    }

    /// Interval between two ticks of the tick source
    pub fn period(self) -> Duration {
        match self {
            TickGranularity::Second => Duration::from_secs(1),
            TickGranularity::Tenth => Duration::from_millis(100),
        }
    }
}

/// What happens when the configured duration changes while the countdown runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationChangePolicy {
    /// Keep counting; the new duration takes effect at the next stop or restart
    #[default]
    Ignore,
    /// Restart the countdown from the new duration immediately
    Reset,
}

/// Behaviour switches of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerOptions {
    pub supports_overtime: bool,
    pub granularity: TickGranularity,
    pub on_duration_change_while_running: DurationChangePolicy,
    /// Overtime reference window used when the configured duration is zero
    pub overtime_fallback_secs: u64,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            supports_overtime: false,
            granularity: TickGranularity::Second,
            on_duration_change_while_running: DurationChangePolicy::Ignore,
            overtime_fallback_secs: 60,
        }
    }
}

/// Observable phase of the countdown, derived from [`TimerState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Completed,
    Overtime,
}

/// Events produced by state transitions, delivered after the transition settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// The countdown reached zero; `overtime` tells whether counting continues
    Completed { overtime: bool },
}

/// Countdown state owned by one widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    configured_secs: u64,
    /// Remaining time in ticks, negative while in overtime
    remaining_ticks: i64,
    running: bool,
    overtime: bool,
    /// Duration change held back by [`DurationChangePolicy::Ignore`]
    pending_secs: Option<u64>,
    options: TimerOptions,
}

impl TimerState {
    /// Create an idle timer with the full duration remaining
    pub fn new(configured_secs: u64, options: TimerOptions) -> Self {
        let mut state = Self {
            configured_secs,
            remaining_ticks: 0,
            running: false,
            overtime: false,
            pending_secs: None,
            options,
        };
        state.remaining_ticks = state.configured_ticks();
        state
    }

    pub fn configured_secs(&self) -> u64 {
        self.configured_secs
    }

    pub fn pending_secs(&self) -> Option<u64> {
        self.pending_secs
    }

    pub fn remaining_ticks(&self) -> i64 {
        self.remaining_ticks
    }

    pub fn configured_ticks(&self) -> i64 {
        let ticks = self.configured_secs as i128 * self.options.granularity.ticks_per_second() as i128;
        ticks.min(i64::MAX as i128) as i64
    }

    /// Remaining time in seconds, negative while in overtime
    pub fn remaining_secs(&self) -> f64 {
        self.remaining_ticks as f64 / self.options.granularity.ticks_per_second() as f64
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_overtime(&self) -> bool {
        self.overtime
    }

    pub fn phase(&self) -> Phase {
        if self.overtime {
            Phase::Overtime
        } else if self.running {
            Phase::Running
        } else if self.remaining_ticks >= self.configured_ticks() {
            Phase::Idle
        } else if self.remaining_ticks <= 0 {
            Phase::Completed
        } else {
            Phase::Paused
        }
    }

    /// True when a stop would change nothing
    pub fn is_at_rest(&self) -> bool {
        !self.running && self.remaining_ticks == self.configured_ticks()
    }

    /// Begin or resume counting down.
    ///
    /// After a natural completion (remaining at or below zero) the countdown
    /// restarts from the configured duration. Starting a running timer does nothing.
    pub fn start(&mut self) -> Option<TimerEvent> {
        if self.running {
            return None;
        }
        if self.remaining_ticks <= 0 {
            self.apply_pending();
            self.reset();
        }
        if self.configured_ticks() == 0 {
            return self.complete();
        }
        self.running = true;
        None
    }

    /// Freeze the countdown, keeping the remaining time.
    ///
    /// Pausing before the first tick leaves nothing to keep, so a held-back
    /// duration change takes effect here.
    pub fn pause(&mut self) {
        self.running = false;
        if self.pending_secs.is_some() && !self.overtime && self.remaining_ticks == self.configured_ticks() {
            self.apply_pending();
            self.reset();
        }
    }

    /// Play/pause toggle
    pub fn toggle(&mut self) -> Option<TimerEvent> {
        if self.running {
            self.pause();
            None
        } else {
            self.start()
        }
    }

    /// Advance one tick. Ticks arriving while not running are ignored.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks <= 0 && !self.overtime {
            return self.complete();
        }
        None
    }

    /// Return to idle with the full duration remaining
    pub fn stop(&mut self) {
        self.running = false;
        self.apply_pending();
        self.reset();
    }

    /// Change the configured duration.
    ///
    /// Resetting a running countdown to zero completes it on the spot.
    pub fn set_duration(&mut self, secs: u64) -> Option<TimerEvent> {
        if self.running {
            return match self.options.on_duration_change_while_running {
                DurationChangePolicy::Reset => {
                    self.pending_secs = None;
                    self.configured_secs = secs;
                    self.reset();
                    if self.configured_ticks() == 0 {
                        self.complete()
                    } else {
                        None
                    }
                }
                DurationChangePolicy::Ignore => {
                    self.pending_secs = (secs != self.configured_secs).then_some(secs);
                    None
                }
            };
        }
        if secs == self.configured_secs && self.pending_secs.is_none() && self.is_at_rest() {
            return None;
        }
        self.pending_secs = None;
        self.configured_secs = secs;
        self.reset();
        None
    }

    /// Fraction of the configured duration still remaining, within [0, 1]
    pub fn progress_fraction(&self) -> f64 {
        let configured = self.configured_ticks();
        if configured <= 0 {
            return 0.0;
        }
        (self.remaining_ticks as f64 / configured as f64).clamp(0.0, 1.0)
    }

    /// Seconds counted since the countdown crossed zero
    pub fn overtime_elapsed_secs(&self) -> f64 {
        if !self.overtime {
            return 0.0;
        }
        self.remaining_ticks.saturating_neg().max(0) as f64 / self.options.granularity.ticks_per_second() as f64
    }

    /// Reference window the overtime arc fills against
    pub fn overtime_window_secs(&self) -> u64 {
        if self.configured_secs == 0 {
            self.options.overtime_fallback_secs
        } else {
            self.configured_secs
        }
    }

    /// Elapsed overtime relative to the reference window, within [0, 1]; `None` outside overtime
    pub fn overtime_fraction(&self) -> Option<f64> {
        if !self.overtime {
            return None;
        }
        let window = self.overtime_window_secs();
        if window == 0 {
            return Some(1.0);
        }
        Some((self.overtime_elapsed_secs() / window as f64).clamp(0.0, 1.0))
    }

    /// Whole seconds shown in the readout: remaining rounded up, or overtime rounded down
    pub fn display_secs(&self) -> u64 {
        let per_second = self.options.granularity.ticks_per_second();
        if self.overtime {
            (self.remaining_ticks.saturating_neg().max(0) / per_second) as u64
        } else {
            let remaining = self.remaining_ticks.max(0);
            (remaining.saturating_add(per_second - 1) / per_second) as u64
        }
    }

    fn complete(&mut self) -> Option<TimerEvent> {
        if self.options.supports_overtime {
            self.overtime = true;
            self.running = true;
        } else {
            self.remaining_ticks = 0;
            self.running = false;
        }
        Some(TimerEvent::Completed { overtime: self.overtime })
    }

    fn reset(&mut self) {
        self.remaining_ticks = self.configured_ticks();
        self.overtime = false;
    }

    fn apply_pending(&mut self) {
        if let Some(secs) = self.pending_secs.take() {
            self.configured_secs = secs;
        }
    }
}
