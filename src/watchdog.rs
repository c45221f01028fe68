//! Periodic no-data watchdog for the capture surface.
//!
//! The watchdog task only ticks; the capture actor owns the decision of
//! whether a tick should produce a synthesized sample, so no state is shared.

use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Whether more than `timeout` has passed since the last produced sample
#[must_use]
pub fn is_stale(last_sample: Instant, now: Instant, timeout: Duration) -> bool {
    now.saturating_duration_since(last_sample) > timeout
}

/// Cancellable ticker task
#[derive(Debug)]
pub struct Watchdog {
    handle: JoinHandle<()>,
}

impl Watchdog {
    /// Spawn a task sending a tick every `period`, first tick after one period.
    ///
    /// A tick is skipped if the previous one has not been consumed yet.
    #[must_use]
    pub fn spawn(period: Duration, ticks: mpsc::Sender<()>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match ticks.try_send(()) {
                    Ok(()) | Err(TrySendError::Full(())) => {}
                    Err(TrySendError::Closed(())) => break,
                }
            }
        });
        Self { handle }
    }

    /// Stop ticking
    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
