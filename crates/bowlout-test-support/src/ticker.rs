//! Test ticker — records requested delays instead of sleeping.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bowlout_core::time::Ticker;

/// A ticker that never sleeps. It records each requested delay and yields
/// once, so concurrently polled futures still interleave at tick
/// boundaries.
#[derive(Debug, Default)]
pub struct InstantTicker {
    waits: Mutex<Vec<Duration>>,
}

impl InstantTicker {
    /// Creates a ticker with no recorded waits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every delay requested so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ticker for InstantTicker {
    async fn wait(&self, delay: Duration) {
        self.waits.lock().unwrap().push(delay);
        tokio::task::yield_now().await;
    }
}
