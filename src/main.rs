//! Countdown Ring - a circular countdown timer driven from the terminal
//!
//! This is the demo host: it mounts one widget, maps stdin commands to the
//! controls and writes a frame for every published state.

use std::path::PathBuf;

use anyhow::Context;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing::{error, info, warn};

use countdown_ring::{
    config::Config,
    controls::{Control, ControlSurface, WidgetSnapshot},
    render::{render_svg, RingGeometry, RingStyle},
    state::{CountdownWidget, TimerState},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout only carries frames
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_ring={}", config.log_level()))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting countdown-ring v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: duration={}s, size={}, stroke_width={}, overtime={}",
        config.duration, config.size, config.stroke_width, config.overtime
    );

    let geometry = config.geometry().context("Refusing to mount the widget")?;
    let style = config.style();

    let widget = CountdownWidget::mount(config.duration, config.timer_options(), || {
        info!("Time is up");
    });

    let frames = tokio::spawn(frame_writer(
        widget.subscribe(),
        geometry,
        style,
        config.svg_out.clone(),
        config.json,
    ));

    info!("Commands:");
    info!("  p | play | pause | <enter>  - Toggle play/pause");
    info!("  s | stop                    - Stop and reset");
    info!("  d <secs> | duration <secs>  - Change the duration");
    info!("  q | quit                    - Exit");

    let stdin = BufReader::new(tokio::io::stdin());
    let outcome = host_session(widget, stdin, config.autostart).await;

    if let Err(e) = frames.await {
        error!("Frame writer ended abnormally: {}", e);
    }

    info!("Shutdown complete");
    outcome
}

/// Drive the widget from `input`, then unmount it whatever the outcome
async fn host_session<R>(widget: CountdownWidget, input: R, autostart: bool) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let outcome = command_loop(&widget, input, autostart).await;
    if let Err(e) = &outcome {
        error!("Command loop failed: {:#}", e);
    }
    widget.unmount().await;
    outcome
}

/// Feed commands to the widget until quit, end of input or a shutdown signal
async fn command_loop<R>(widget: &CountdownWidget, input: R, autostart: bool) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    if autostart {
        widget.start()?;
    }

    let mut lines = input.lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        if !handle_command(widget, &line)? {
                            return Ok(());
                        }
                    }
                    None => {
                        info!("Input closed");
                        return Ok(());
                    }
                }
            }

            result = &mut shutdown => {
                result.context("Failed to install signal handler")?;
                info!("Shutdown signal received");
                return Ok(());
            }
        }
    }
}

/// Apply one line of input. Returns false when the host should exit.
fn handle_command(widget: &CountdownWidget, line: &str) -> anyhow::Result<bool> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (Some("q" | "quit"), _) => return Ok(false),
        (Some("d" | "duration"), Some(secs)) => match secs.parse::<u64>() {
            Ok(secs) => {
                widget.set_duration(secs)?;
            }
            Err(e) => warn!("Invalid duration '{}': {}", secs, e),
        },
        _ => match line.parse::<Control>() {
            Ok(control) => {
                ControlSurface::press(widget, control)?;
            }
            Err(e) => warn!("{}", e),
        },
    }
    Ok(true)
}

/// Write a frame for the current state and every later one until the widget goes away
async fn frame_writer(
    mut updates: watch::Receiver<TimerState>,
    geometry: RingGeometry,
    style: RingStyle,
    svg_out: Option<PathBuf>,
    json: bool,
) {
    loop {
        let state = *updates.borrow_and_update();
        write_frame(&state, &geometry, &style, svg_out.as_ref(), json).await;

        if updates.changed().await.is_err() {
            break;
        }
    }
}

async fn write_frame(
    state: &TimerState,
    geometry: &RingGeometry,
    style: &RingStyle,
    svg_out: Option<&PathBuf>,
    json: bool,
) {
    let snapshot = WidgetSnapshot::new(geometry, state);

    if json {
        match serde_json::to_string(&snapshot) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize snapshot: {}", e),
        }
    } else {
        println!(
            "{:>8}  {:>3.0}%  {:?}  [{}] [Stop{}]",
            snapshot.readout,
            snapshot.progress_fraction * 100.0,
            snapshot.phase,
            snapshot.play_pause,
            if snapshot.stop_disabled { " (disabled)" } else { "" }
        );
    }

    if let Some(path) = svg_out {
        if let Err(e) = tokio::fs::write(path, render_svg(geometry, style, state)).await {
            error!("Failed to write {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    use countdown_ring::state::TimerOptions;

    fn counting_widget(duration_secs: u64) -> (CountdownWidget, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let widget = CountdownWidget::mount(duration_secs, TimerOptions::default(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (widget, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_unmounts_after_input_error() {
        let (widget, calls) = counting_widget(2);
        let mut updates = widget.subscribe();

        // Invalid UTF-8 makes reading the first line fail
        let input: &[u8] = &[0xff, 0xfe, b'\n'];
        let outcome = host_session(widget, input, true).await;
        assert!(outcome.is_err());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        updates.borrow_and_update();
        assert!(updates.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_applies_commands_until_quit() {
        let (widget, _calls) = counting_widget(10);
        let mut updates = widget.subscribe();

        let input: &[u8] = b"d 30\np\nq\np\n";
        host_session(widget, input, false).await.unwrap();

        let last = *updates.borrow_and_update();
        assert_eq!(last.configured_secs(), 30);
        assert!(last.is_running());
    }
}
