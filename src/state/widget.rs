//! Mounted countdown widget: owns the timer state, its tick source and the completion queue

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::{TimerEvent, TimerOptions, TimerState};
use crate::{
    error::{Error, Result},
    tasks::{completion_task, CompletionCallback, TickSource},
};

/// State shared between the widget and its background tasks
#[derive(Debug)]
pub struct Shared {
    inner: Mutex<Inner>,
    period: Duration,
    /// Every published timer state
    updates_tx: watch::Sender<TimerState>,
    /// Completion events waiting for the dispatcher
    events_tx: mpsc::UnboundedSender<TimerEvent>,
}

#[derive(Debug)]
struct Inner {
    timer: TimerState,
    /// Bumped each time the timer starts running; identifies the live tick source
    generation: u64,
}

/// Result of applying one transition
#[derive(Debug, Clone, Copy)]
struct Applied {
    before: TimerState,
    after: TimerState,
    generation: u64,
}

impl Shared {
    pub fn period(&self) -> Duration {
        self.period
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| Error::StateUnavailable(format!("Failed to lock timer state: {}", e)))
    }

    /// Apply one tick on behalf of the tick source identified by `generation`.
    ///
    /// Returns whether that tick source should keep running.
    pub fn advance(&self, generation: u64) -> Result<bool> {
        let mut inner = self.lock()?;
        if inner.generation != generation || !inner.timer.is_running() {
            return Ok(false);
        }

        let event = inner.timer.tick();
        let timer = inner.timer;
        debug!(
            "Tick: remaining={:.1}s overtime={}",
            timer.remaining_secs(),
            timer.is_overtime()
        );
        self.publish(timer, event);
        Ok(timer.is_running())
    }

    /// Run a transition under the lock and publish the result if anything changed
    fn apply<F>(&self, transition: F) -> Result<Applied>
    where
        F: FnOnce(&mut TimerState) -> Option<TimerEvent>,
    {
        let mut inner = self.lock()?;
        let before = inner.timer;
        let event = transition(&mut inner.timer);
        let after = inner.timer;

        if !before.is_running() && after.is_running() {
            inner.generation += 1;
        }
        if before != after || event.is_some() {
            self.publish(after, event);
        }

        Ok(Applied {
            before,
            after,
            generation: inner.generation,
        })
    }

    /// Publish a new state and queue its event. Called with the state lock held so
    /// watchers observe states in transition order; the callback itself only runs
    /// later, on the dispatcher task.
    fn publish(&self, timer: TimerState, event: Option<TimerEvent>) {
        self.updates_tx.send_replace(timer);

        if let Some(event) = event {
            if let Err(e) = self.events_tx.send(event) {
                warn!("Failed to queue completion event: {}", e);
            }
        }
    }
}

/// A mounted countdown ring widget.
///
/// Must be created inside a tokio runtime. Each instance is independent and
/// owns at most one tick source at a time.
#[derive(Debug)]
pub struct CountdownWidget {
    shared: Arc<Shared>,
    tick_source: Mutex<Option<TickSource>>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl CountdownWidget {
    /// Mount a new idle widget with the full duration remaining
    pub fn mount<F>(duration_secs: u64, options: TimerOptions, on_complete: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let timer = TimerState::new(duration_secs, options);
        let (updates_tx, _) = watch::channel(timer);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let on_complete: CompletionCallback = Arc::new(on_complete);
        let dispatcher = tokio::spawn(completion_task(events_rx, on_complete));

        info!(
            "Mounted countdown widget: duration={}s overtime={} granularity={:?}",
            duration_secs, options.supports_overtime, options.granularity
        );

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner { timer, generation: 0 }),
                period: options.granularity.period(),
                updates_tx,
                events_tx,
            }),
            tick_source: Mutex::new(None),
            dispatcher: Mutex::new(Some(dispatcher)),
        }
    }

    /// Current timer state
    pub fn state(&self) -> Result<TimerState> {
        self.shared.lock().map(|inner| inner.timer)
    }

    /// Receive every state the widget publishes
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.updates_tx.subscribe()
    }

    /// Start or resume the countdown; restarts after a natural completion
    pub fn start(&self) -> Result<TimerState> {
        info!("Starting countdown");
        self.transition(|timer| timer.start())
    }

    /// Pause the countdown, keeping the remaining time
    pub fn pause(&self) -> Result<TimerState> {
        info!("Pausing countdown");
        self.transition(|timer| {
            timer.pause();
            None
        })
    }

    /// Play/pause toggle
    pub fn toggle(&self) -> Result<TimerState> {
        self.transition(|timer| timer.toggle())
    }

    /// Stop and return to idle
    pub fn stop(&self) -> Result<TimerState> {
        info!("Stopping countdown");
        self.transition(|timer| {
            timer.stop();
            None
        })
    }

    /// Change the configured duration
    pub fn set_duration(&self, secs: u64) -> Result<TimerState> {
        info!("Setting countdown duration to: {}s", secs);
        self.transition(|timer| timer.set_duration(secs))
    }

    /// Whether a live tick source currently exists
    pub fn has_active_tick_source(&self) -> Result<bool> {
        self.tick_source
            .lock()
            .map(|slot| slot.as_ref().is_some_and(TickSource::is_active))
            .map_err(|e| Error::StateUnavailable(format!("Failed to lock tick source: {}", e)))
    }

    /// Release the tick source and wait until every queued completion has been delivered
    pub async fn unmount(self) {
        let dispatcher = self
            .dispatcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        // Drop releases the tick source and closes the completion queue
        drop(self);

        if let Some(dispatcher) = dispatcher {
            if let Err(e) = dispatcher.await {
                warn!("Completion dispatcher ended abnormally: {}", e);
            }
        }
        info!("Countdown widget unmounted");
    }

    /// Apply a transition, then bring the tick source in line with `running`
    fn transition<F>(&self, transition: F) -> Result<TimerState>
    where
        F: FnOnce(&mut TimerState) -> Option<TimerEvent>,
    {
        let mut slot = self
            .tick_source
            .lock()
            .map_err(|e| Error::StateUnavailable(format!("Failed to lock tick source: {}", e)))?;

        let applied = self.shared.apply(transition)?;
        let started = !applied.before.is_running() && applied.after.is_running();

        if started || !applied.after.is_running() {
            if let Some(previous) = slot.take() {
                previous.release();
                debug!("Released tick source");
            }
        }
        if started {
            *slot = Some(TickSource::spawn(Arc::clone(&self.shared), applied.generation));
            debug!("Spawned tick source generation {}", applied.generation);
        }

        Ok(applied.after)
    }
}

impl Drop for CountdownWidget {
    fn drop(&mut self) {
        let slot = self
            .tick_source
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(source) = slot.take() {
            source.release();
        }
    }
}
