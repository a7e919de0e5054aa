//! Cancellable periodic heartbeat task.
//!
//! The scheduler owns the timer lifecycle: `arm` begins firing the poll at a
//! fixed cadence, `disarm` stops it. Disarm is safe when never armed, and
//! arming twice replaces the prior schedule instead of stacking a second
//! polling loop. Each tick's poll runs as its own task, so a slow poll never
//! delays the next tick and disarming never retracts a poll already in
//! flight.

use std::future::Future;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Fixed heartbeat cadence.
pub const HEARTBEAT_CADENCE: Duration = Duration::from_millis(1000);

/// Owns the periodic-timer lifecycle for heartbeat polling.
#[derive(Debug, Default)]
pub struct HeartbeatScheduler {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl HeartbeatScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin firing `poll` every [`HEARTBEAT_CADENCE`], first tick one
    /// cadence from now.
    ///
    /// Replaces any prior schedule.
    pub fn arm<F, Fut>(&self, poll: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + HEARTBEAT_CADENCE, HEARTBEAT_CADENCE);
            loop {
                ticker.tick().await;
                tokio::spawn(poll());
            }
        });

        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = task.replace(handle) {
            previous.abort();
        }
    }

    /// Stop firing. No-op when unarmed; polls already in flight are not
    /// retracted.
    pub fn disarm(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }

    /// Whether a schedule is currently armed.
    pub fn is_armed(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Drop for HeartbeatScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}
