//! Per-round values.

use std::time::Duration;

use bowlout_core::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// One scheduled batch of eliminations, computed fresh at round start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round number within the current game.
    pub number: u32,
    /// Alive count when the round was planned.
    pub remaining_before: usize,
    /// Eliminations planned, after clamping.
    pub batch_size: usize,
    /// Gap between eliminations, in milliseconds.
    pub delay_ms: u64,
    /// Participant shielded from this round, if any.
    pub protected_id: Option<ParticipantId>,
}

impl Round {
    /// Returns the delay as a `Duration`.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
