//! Time readout formatting

use crate::state::TimerState;

/// Format whole seconds as zero-padded `MM:SS`, prefixed with `+` in overtime
pub fn format_time(secs: u64, overtime: bool) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    if overtime {
        format!("+{:02}:{:02}", minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Readout text for the current state of a timer
pub fn readout(state: &TimerState) -> String {
    format_time(state.display_secs(), state.is_overtime())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{TickGranularity, TimerOptions};
    use test_case::test_case;

    #[test_case(0, false, "00:00")]
    #[test_case(5, false, "00:05")]
    #[test_case(59, false, "00:59")]
    #[test_case(60, false, "01:00")]
    #[test_case(125, false, "02:05")]
    #[test_case(6000, false, "100:00")]
    #[test_case(5, true, "+00:05")]
    #[test_case(61, true, "+01:01")]
    fn formats_minutes_and_seconds(secs: u64, overtime: bool, expected: &str) {
        assert_eq!(format_time(secs, overtime), expected);
    }

    #[test]
    fn readout_rounds_countdown_up() {
        let options = TimerOptions {
            granularity: TickGranularity::Tenth,
            ..TimerOptions::default()
        };
        let mut state = TimerState::new(10, options);
        state.start();
        state.tick();
        assert_eq!(readout(&state), "00:10");
    }
}
