//! Tick source background task

use std::sync::Arc;

use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::widget::Shared;

/// Handle to a running tick task. Dropping the handle also stops the task.
#[derive(Debug)]
pub struct TickSource {
    cancel_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TickSource {
    /// Spawn a tick task that advances the shared timer once per period
    pub fn spawn(shared: Arc<Shared>, generation: u64) -> Self {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let handle = tokio::spawn(tick_task(shared, generation, cancel_rx));
        Self {
            cancel_tx: Some(cancel_tx),
            handle,
        }
    }

    /// Whether the task is still alive
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the task; it will not touch the timer again
    pub fn release(mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            // The task may already have exited on its own
            let _ = cancel_tx.send(());
        }
    }
}

/// Background task that ticks the timer until cancelled or the countdown stops running
///
/// `generation` identifies this task; a tick from a superseded task is refused by the widget.
async fn tick_task(shared: Arc<Shared>, generation: u64, mut cancel_rx: oneshot::Receiver<()>) {
    let period = shared.period();
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!("Tick source started with period {:?}", period);

    loop {
        tokio::select! {
            biased;

            // Fires on release and when the handle is dropped
            _ = &mut cancel_rx => {
                debug!("Tick source released");
                break;
            }

            _ = interval.tick() => {
                match shared.advance(generation) {
                    Ok(true) => {}
                    Ok(false) => {
                        debug!("Timer no longer running, tick source exiting");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to advance timer: {}", e);
                        break;
                    }
                }
            }
        }
    }

    info!("Tick source stopped");
}
