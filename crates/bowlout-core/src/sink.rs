//! Presentation sink abstraction.
//!
//! The scheduler knows nothing about grids, sounds, or popups. It reports
//! what happened through this trait and lets the front end decide how to
//! show it.

use async_trait::async_trait;

use crate::participant::Participant;
use crate::stage::Stage;

/// Outcome of the auction checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuctionDecision {
    /// Rename the distinguished participant to the given name.
    Confirm(String),
    /// Leave every name unchanged.
    Skip,
}

/// Receives scheduler notifications and collects the auction decision.
#[async_trait]
pub trait PresentationSink: Send + Sync {
    /// A new roster replaced the previous one.
    async fn on_roster_loaded(&self, participants: &[Participant]);

    /// A round is about to start.
    async fn on_round_start(&self, batch_size: usize, delay_ms: u64);

    /// A participant was eliminated; `message` should stay visible for
    /// `display_ms` milliseconds.
    async fn on_eliminate(&self, participant: &Participant, message: &str, display_ms: u64);

    /// The current round finished.
    async fn on_round_end(&self);

    /// The game moved to `stage`.
    async fn on_stage_change(&self, stage: Stage);

    /// Ten participants remain. Returns the auction decision; called again
    /// if a confirmation carries an empty name.
    async fn on_auction_checkpoint(&self, candidates: &[Participant]) -> AuctionDecision;

    /// The game has a winner. The announcement is persistent.
    async fn on_winner(&self, participant: &Participant);
}
