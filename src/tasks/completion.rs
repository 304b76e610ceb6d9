//! Completion dispatcher background task

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::state::TimerEvent;

/// Callback invoked when a countdown reaches zero
pub type CompletionCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Background task that delivers queued completion events to the host callback.
///
/// Events are queued by state transitions and only delivered here, after the
/// transition has released the timer state.
pub async fn completion_task(mut events_rx: mpsc::UnboundedReceiver<TimerEvent>, on_complete: CompletionCallback) {
    debug!("Starting completion dispatcher");

    while let Some(event) = events_rx.recv().await {
        match event {
            TimerEvent::Completed { overtime } => {
                info!("Countdown complete (overtime={})", overtime);
                on_complete();
            }
        }
    }

    debug!("Completion queue closed, dispatcher exiting");
}
