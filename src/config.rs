//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{
    error::Result,
    render::{RingGeometry, RingStyle},
    state::{DurationChangePolicy, TickGranularity, TimerOptions},
};

/// Tick granularity as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GranularityArg {
    Second,
    Tenth,
}

/// Duration change policy as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DurationChangeArg {
    Ignore,
    Reset,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-ring")]
#[command(about = "A circular countdown timer driven from the terminal")]
#[command(version)]
pub struct Config {
    /// Countdown length in seconds
    #[arg(short, long, default_value = "60")]
    pub duration: u64,

    /// Ring size in pixels
    #[arg(long, default_value = "300")]
    pub size: f64,

    /// Ring stroke width in pixels
    #[arg(long, default_value = "20")]
    pub stroke_width: f64,

    /// Color of the progress arc
    #[arg(long, default_value = "#4caf50")]
    pub stroke_color: String,

    /// Color of the overtime arc
    #[arg(long, default_value = "#f44336")]
    pub overtime_stroke_color: String,

    /// Color of the background track
    #[arg(long, default_value = "#e6e6e6")]
    pub track_color: String,

    /// Do not draw the numeric readout in the ring
    #[arg(long)]
    pub hide_remaining_time: bool,

    /// Keep counting after zero instead of stopping
    #[arg(long)]
    pub overtime: bool,

    /// Time represented by one tick
    #[arg(long, value_enum, default_value = "second")]
    pub granularity: GranularityArg,

    /// What a duration change does while the countdown runs
    #[arg(long, value_enum, default_value = "ignore")]
    pub on_duration_change: DurationChangeArg,

    /// Rewrite this SVG file on every update
    #[arg(long)]
    pub svg_out: Option<PathBuf>,

    /// Print a JSON snapshot per update instead of the readout line
    #[arg(long)]
    pub json: bool,

    /// Start counting as soon as the widget is mounted
    #[arg(long)]
    pub autostart: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Timer behaviour selected on the command line
    pub fn timer_options(&self) -> TimerOptions {
        TimerOptions {
            supports_overtime: self.overtime,
            granularity: match self.granularity {
                GranularityArg::Second => TickGranularity::Second,
                GranularityArg::Tenth => TickGranularity::Tenth,
            },
            on_duration_change_while_running: match self.on_duration_change {
                DurationChangeArg::Ignore => DurationChangePolicy::Ignore,
                DurationChangeArg::Reset => DurationChangePolicy::Reset,
            },
            ..TimerOptions::default()
        }
    }

    /// Validated ring geometry
    pub fn geometry(&self) -> Result<RingGeometry> {
        RingGeometry::new(self.size, self.stroke_width)
    }

    pub fn style(&self) -> RingStyle {
        RingStyle {
            stroke_color: self.stroke_color.clone(),
            overtime_stroke_color: self.overtime_stroke_color.clone(),
            track_color: self.track_color.clone(),
            show_remaining_time: !self.hide_remaining_time,
            font_size: None,
        }
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_one_minute_countdown() {
        let config = Config::try_parse_from(["countdown-ring"]).unwrap();
        assert_eq!(config.duration, 60);
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.timer_options(), TimerOptions::default());

        let geometry = config.geometry().unwrap();
        assert_eq!(geometry.radius, 140.0);
        assert!(config.style().show_remaining_time);
    }

    #[test]
    fn maps_timer_flags() {
        let config = Config::try_parse_from([
            "countdown-ring",
            "--overtime",
            "--granularity",
            "tenth",
            "--on-duration-change",
            "reset",
            "-v",
        ])
        .unwrap();

        let options = config.timer_options();
        assert!(options.supports_overtime);
        assert_eq!(options.granularity, TickGranularity::Tenth);
        assert_eq!(options.on_duration_change_while_running, DurationChangePolicy::Reset);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn rejects_stroke_wider_than_ring() {
        let config =
            Config::try_parse_from(["countdown-ring", "--size", "20", "--stroke-width", "20"]).unwrap();
        assert!(config.geometry().is_err());
    }
}
