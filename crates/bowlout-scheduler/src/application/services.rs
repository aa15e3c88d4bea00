//! Collaborators shared by the scheduler's handlers.

use std::sync::{Arc, Mutex};

use bowlout_core::rng::DeterministicRng;
use bowlout_core::sink::PresentationSink;
use bowlout_core::time::{Clock, Ticker};

/// Clock, randomness, pacing, and presentation for one game.
#[derive(Clone)]
pub struct GameServices {
    /// Timestamps for recorded events.
    pub clock: Arc<dyn Clock>,
    /// Target and message draws.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Waits between eliminations.
    pub ticker: Arc<dyn Ticker>,
    /// Receives every notification.
    pub sink: Arc<dyn PresentationSink>,
}

impl GameServices {
    /// Bundles the collaborators.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        ticker: Arc<dyn Ticker>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            clock,
            rng,
            ticker,
            sink,
        }
    }
}

impl std::fmt::Debug for GameServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameServices").finish_non_exhaustive()
    }
}
