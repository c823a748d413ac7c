//! Long-poll event subscriber.
//!
//! One background task per subscription repeatedly calls the controller's
//! blocking change feed with a cursor the controller hands back:
//!
//! ```text
//! Idle ──▶ Polling ──ok──▶ callback (if changes) ──▶ Idle ──▶ Polling ...
//!             │
//!             └──err/timeout──▶ BackoffWait (fixed delay) ──▶ Polling
//! ```
//!
//! Successful polls re-enter `Polling` immediately. Failures never end the
//! loop; only the [`CancellationToken`] does.
//!
//! # Example
//!
//! ```rust,ignore
//! let handle = provider.subscribe(Arc::new(|events| {
//!     for event in &events {
//!         println!("{}: {}", event.name, event.option);
//!     }
//! }));
//! // ...
//! handle.shutdown();
//! ```

use std::sync::Arc;

use homeweave_api::{ChangeEvent, JeedomRpc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::PollConfig;
use crate::error::CoreError;

/// Receives each non-empty batch of changes, synchronously, on the poll task.
pub type ChangeCallback = Arc<dyn Fn(Vec<ChangeEvent>) + Send + Sync>;

// ── PollPhase ────────────────────────────────────────────────────────

/// Where the poll loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Polling,
    BackoffWait,
}

// ── SubscriptionHandle ───────────────────────────────────────────────

/// Handle to a running poll loop.
///
/// Dropping the handle does not stop the loop; call
/// [`shutdown`](Self::shutdown) or cancel the parent token.
pub struct SubscriptionHandle {
    cancel: CancellationToken,
    phase: watch::Receiver<PollPhase>,
    cursor: watch::Receiver<f64>,
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    /// Signal the loop to stop. In-flight polls are abandoned.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn phase(&self) -> PollPhase {
        *self.phase.borrow()
    }

    /// Watch phase transitions.
    pub fn phase_changes(&self) -> watch::Receiver<PollPhase> {
        self.phase.clone()
    }

    /// Latest cursor the controller returned (`0` before the first success).
    pub fn cursor(&self) -> f64 {
        *self.cursor.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the loop task to exit.
    pub async fn join(self) -> Result<(), CoreError> {
        self.task
            .await
            .map_err(|e| CoreError::Internal(format!("poll task failed: {e}")))
    }
}

/// Spawn a poll loop against `rpc`.
///
/// Must be called from within a tokio runtime. The loop stops when `cancel`
/// (or any parent of it) is cancelled.
pub fn spawn_poll_loop(
    rpc: Arc<dyn JeedomRpc>,
    config: PollConfig,
    callback: ChangeCallback,
    cancel: CancellationToken,
) -> SubscriptionHandle {
    let (phase_tx, phase_rx) = watch::channel(PollPhase::Idle);
    let (cursor_tx, cursor_rx) = watch::channel(0.0_f64);

    let task_cancel = cancel.clone();
    let task = tokio::spawn(async move {
        poll_loop(rpc, config, callback, phase_tx, cursor_tx, task_cancel).await;
    });

    SubscriptionHandle {
        cancel,
        phase: phase_rx,
        cursor: cursor_rx,
        task,
    }
}

// ── Background poll loop ─────────────────────────────────────────────

async fn poll_loop(
    rpc: Arc<dyn JeedomRpc>,
    config: PollConfig,
    callback: ChangeCallback,
    phase: watch::Sender<PollPhase>,
    cursor_tx: watch::Sender<f64>,
    cancel: CancellationToken,
) {
    let mut cursor = 0.0_f64;

    loop {
        phase.send_replace(PollPhase::Polling);
        trace!(cursor, "polling for changes");

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = tokio::time::timeout(config.timeout, rpc.event_changes(cursor, config.timeout)) => {
                match result {
                    Ok(inner) => inner.map_err(CoreError::from),
                    Err(_) => Err(CoreError::Timeout {
                        timeout_secs: config.timeout.as_secs(),
                    }),
                }
            }
        };

        match outcome {
            Ok(changes) => {
                if changes.datetime >= cursor {
                    cursor = changes.datetime;
                    cursor_tx.send_replace(cursor);
                } else {
                    debug!(cursor, returned = changes.datetime, "ignoring cursor that moved backwards");
                }

                if !changes.result.is_empty() {
                    debug!(count = changes.result.len(), cursor, "dispatching changes");
                    callback(changes.result);
                }
                phase.send_replace(PollPhase::Idle);
            }
            Err(e) => {
                warn!(
                    error = %e,
                    retry_ms = u64::try_from(config.retry_delay.as_millis()).unwrap_or(u64::MAX),
                    "polling error"
                );
                phase.send_replace(PollPhase::BackoffWait);

                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(config.retry_delay) => {}
                }
            }
        }
    }

    phase.send_replace(PollPhase::Idle);
    debug!("poll loop exiting");
}
