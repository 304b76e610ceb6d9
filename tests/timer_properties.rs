// Property-based tests for the countdown state machine
// Random operation sequences must never push derived values out of range

use countdown_ring::{
    render::{RingFrame, RingGeometry},
    state::{DurationChangePolicy, TickGranularity, TimerEvent, TimerOptions, TimerState},
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Toggle,
    Tick,
    Stop,
    SetDuration(u64),
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Start),
        1 => Just(Op::Pause),
        1 => Just(Op::Toggle),
        8 => Just(Op::Tick),
        1 => Just(Op::Stop),
        1 => (0..200u64).prop_map(Op::SetDuration),
    ]
}

fn timer_options() -> impl Strategy<Value = TimerOptions> {
    (
        any::<bool>(),
        prop_oneof![Just(TickGranularity::Second), Just(TickGranularity::Tenth)],
        prop_oneof![Just(DurationChangePolicy::Ignore), Just(DurationChangePolicy::Reset)],
    )
        .prop_map(|(supports_overtime, granularity, policy)| TimerOptions {
            supports_overtime,
            granularity,
            on_duration_change_while_running: policy,
            ..TimerOptions::default()
        })
}

fn apply(state: &mut TimerState, op: &Op) -> Option<TimerEvent> {
    match op {
        Op::Start => state.start(),
        Op::Pause => {
            state.pause();
            None
        }
        Op::Toggle => state.toggle(),
        Op::Tick => state.tick(),
        Op::Stop => {
            state.stop();
            None
        }
        Op::SetDuration(secs) => state.set_duration(*secs),
    }
}

proptest! {
    /// Property: fractions and offsets stay in range for any sequence of operations
    #[test]
    fn prop_derived_values_stay_in_range(
        duration in 0..200u64,
        options in timer_options(),
        ops in prop::collection::vec(any_op(), 0..300),
    ) {
        let geometry = RingGeometry::new(300.0, 20.0).unwrap();
        let mut state = TimerState::new(duration, options);

        for op in &ops {
            apply(&mut state, op);

            let progress = state.progress_fraction();
            prop_assert!((0.0..=1.0).contains(&progress));
            if let Some(fraction) = state.overtime_fraction() {
                prop_assert!((0.0..=1.0).contains(&fraction));
            }
            prop_assert!(state.remaining_ticks() <= state.configured_ticks());
            if state.is_overtime() {
                prop_assert!(state.remaining_ticks() <= 0);
            }
            if !options.supports_overtime {
                prop_assert!(state.remaining_ticks() >= 0);
            }

            let frame = RingFrame::from_state(&geometry, &state);
            prop_assert!(frame.progress_offset >= 0.0 && frame.progress_offset <= geometry.circumference);
            if let Some(offset) = frame.overtime_offset {
                prop_assert!(offset >= 0.0 && offset <= geometry.circumference);
            }
        }
    }

    /// Property: stop always returns to idle, whatever came before
    #[test]
    fn prop_stop_returns_to_idle(
        duration in 0..200u64,
        options in timer_options(),
        ops in prop::collection::vec(any_op(), 0..100),
    ) {
        let mut state = TimerState::new(duration, options);
        for op in &ops {
            apply(&mut state, op);
        }

        state.stop();
        prop_assert!(!state.is_running());
        prop_assert!(!state.is_overtime());
        prop_assert_eq!(state.remaining_ticks(), state.configured_ticks());
        prop_assert_eq!(state.tick(), None);
    }

    /// Property: a full uninterrupted run completes exactly once
    #[test]
    fn prop_full_run_completes_once(
        duration in 1..300u64,
        options in timer_options(),
    ) {
        let mut state = TimerState::new(duration, options);
        let mut completions = 0;
        if state.start().is_some() {
            completions += 1;
        }
        for _ in 0..state.configured_ticks() {
            if state.tick().is_some() {
                completions += 1;
            }
        }

        prop_assert_eq!(completions, 1);
        prop_assert_eq!(state.remaining_ticks(), 0);
        prop_assert_eq!(state.is_overtime(), options.supports_overtime);
    }
}
