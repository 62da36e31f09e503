//! Aggregation-wide deadline timer.

use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A one-shot wall-clock deadline for a single check.
///
/// The timer runs on its own task and signals on a dedicated channel exactly
/// once. It never looks at verdicts. Dropping the deadline cancels the timer.
#[derive(Debug)]
pub struct Deadline {
    duration: Duration,
    signal: Option<oneshot::Receiver<()>>,
    timer: JoinHandle<()>,
    fired: bool,
}

impl Deadline {
    /// Starts the timer. Must be called from within a tokio runtime.
    pub fn start(duration: Duration) -> Self {
        let (tx, rx) = oneshot::channel();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // The receiver is gone if the check already resolved.
            let _ = tx.send(());
        });

        Self {
            duration,
            signal: Some(rx),
            timer,
            fired: false,
        }
    }

    /// Completes when the deadline passes.
    ///
    /// Completes at most once per deadline; after that, awaiting it again
    /// never completes. Safe to use as a `select!` branch.
    pub async fn fired(&mut self) {
        let Some(signal) = self.signal.as_mut() else {
            return std::future::pending().await;
        };

        match signal.await {
            Ok(()) => {
                self.signal = None;
                self.fired = true;
            }
            // The timer task was cancelled without signalling.
            Err(_) => {
                self.signal = None;
                std::future::pending::<()>().await;
            }
        }
    }

    /// Returns `true` once the signal has been observed.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Returns the configured duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
