//! Test sink — records every presentation notification.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bowlout_core::participant::Participant;
use bowlout_core::sink::{AuctionDecision, PresentationSink};
use bowlout_core::stage::Stage;

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    /// `on_roster_loaded` with the participant count.
    RosterLoaded(usize),
    /// `on_round_start`.
    RoundStart { batch_size: usize, delay_ms: u64 },
    /// `on_eliminate`.
    Eliminate {
        participant: Participant,
        message: String,
        display_ms: u64,
    },
    /// `on_round_end`.
    RoundEnd,
    /// `on_stage_change`.
    StageChange(Stage),
    /// `on_auction_checkpoint` with the candidates offered.
    AuctionCheckpoint(Vec<Participant>),
    /// `on_winner`.
    Winner(Participant),
}

/// A sink that records all calls and answers auction checkpoints from a
/// script. Once the script runs out it answers `Skip`.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    auction_script: Mutex<VecDeque<AuctionDecision>>,
}

impl RecordingSink {
    /// Creates a sink that skips every auction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that answers auctions with `decisions`, in order.
    #[must_use]
    pub fn with_auction(decisions: Vec<AuctionDecision>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            auction_script: Mutex::new(decisions.into()),
        }
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns only the eliminated participants, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn eliminated(&self) -> Vec<Participant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Eliminate { participant, .. } => Some(participant.clone()),
                _ => None,
            })
            .collect()
    }

    /// Counts calls matching `predicate`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn count(&self, predicate: impl Fn(&SinkCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PresentationSink for RecordingSink {
    async fn on_roster_loaded(&self, participants: &[Participant]) {
        self.record(SinkCall::RosterLoaded(participants.len()));
    }

    async fn on_round_start(&self, batch_size: usize, delay_ms: u64) {
        self.record(SinkCall::RoundStart {
            batch_size,
            delay_ms,
        });
    }

    async fn on_eliminate(&self, participant: &Participant, message: &str, display_ms: u64) {
        self.record(SinkCall::Eliminate {
            participant: participant.clone(),
            message: message.to_owned(),
            display_ms,
        });
    }

    async fn on_round_end(&self) {
        self.record(SinkCall::RoundEnd);
    }

    async fn on_stage_change(&self, stage: Stage) {
        self.record(SinkCall::StageChange(stage));
    }

    async fn on_auction_checkpoint(&self, candidates: &[Participant]) -> AuctionDecision {
        self.record(SinkCall::AuctionCheckpoint(candidates.to_vec()));
        // Suspend once, as a real prompt would, so other tasks can observe
        // the paused game.
        tokio::task::yield_now().await;
        self.auction_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(AuctionDecision::Skip)
    }

    async fn on_winner(&self, participant: &Participant) {
        self.record(SinkCall::Winner(participant.clone()));
    }
}
