//! Time seams: event timestamps and tick pacing.
//!
//! A round is a sequence of eliminations spaced by a delay. The scheduler
//! stamps events through a `Clock` and waits on a `Ticker` between ticks, so
//! tests can run a whole game at a fixed instant without real sleeps while
//! production paces eliminations on the tokio timer.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of event timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// `Clock` backed by `Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Waits out the gap between two scheduled ticks.
#[async_trait]
pub trait Ticker: Send + Sync {
    /// Suspends the caller for `delay`.
    async fn wait(&self, delay: Duration);
}

/// Production ticker backed by `tokio::time::sleep`, with an optional scale
/// factor applied to every delay.
#[derive(Debug, Clone, Copy)]
pub struct TokioTicker {
    scale: f64,
}

impl TokioTicker {
    /// Creates a ticker that sleeps for exactly the requested delay.
    #[must_use]
    pub fn new() -> Self {
        Self { scale: 1.0 }
    }

    /// Creates a ticker that multiplies every delay by `scale`.
    ///
    /// Negative and non-finite scales are treated as zero.
    #[must_use]
    pub fn scaled(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            0.0
        };
        Self { scale }
    }

    /// Returns the delay this ticker will actually sleep for.
    #[must_use]
    pub fn effective_delay(&self, delay: Duration) -> Duration {
        delay.mul_f64(self.scale)
    }
}

impl Default for TokioTicker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ticker for TokioTicker {
    async fn wait(&self, delay: Duration) {
        let delay = self.effective_delay(delay);
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}
