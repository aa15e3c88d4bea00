//! Domain events for the scheduler context.

use bowlout_core::event::{DomainEvent, EventMetadata};
use bowlout_core::participant::{Participant, ParticipantId};
use bowlout_core::stage::Stage;
use serde::{Deserialize, Serialize};

use super::round::Round;

/// Emitted when a roster replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterLoaded {
    /// The new participants, all alive.
    pub participants: Vec<Participant>,
}

/// Emitted when a round is planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStarted {
    /// The planned round.
    pub round: Round,
    /// Participants drawn for elimination, in elimination order.
    pub targets: Vec<ParticipantId>,
}

/// Emitted for each elimination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantEliminated {
    /// The participant as it stands after elimination.
    pub participant: Participant,
    /// Wicket ordinal since the last counter reset.
    pub wicket: u32,
    /// Alive count after this elimination.
    pub remaining_after: usize,
    /// Dismissal message.
    pub message: String,
    /// How long the message should stay visible.
    pub display_ms: u64,
}

/// Emitted when a round finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEnded {
    /// The round that finished.
    pub round_number: u32,
    /// Eliminations it actually performed.
    pub eliminated: usize,
    /// Alive count at the end of the round.
    pub remaining: usize,
}

/// Emitted on every stage transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageChanged {
    /// Previous stage.
    pub from: Stage,
    /// New stage.
    pub to: Stage,
}

/// Emitted when the game pauses for the auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionCheckpointReached {
    /// The participants still alive.
    pub candidates: Vec<Participant>,
}

/// Emitted when the auction renames the distinguished participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRenamed {
    /// The renamed participant.
    pub participant_id: ParticipantId,
    /// Name before the auction.
    pub previous_name: String,
    /// Name after the auction.
    pub display_name: String,
}

/// Emitted once the last participant standing is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerDeclared {
    /// The winner.
    pub participant: Participant,
}

/// Event payload variants for the scheduler context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventKind {
    /// A roster was loaded.
    RosterLoaded(RosterLoaded),
    /// A round was planned.
    RoundStarted(RoundStarted),
    /// A participant was eliminated.
    ParticipantEliminated(ParticipantEliminated),
    /// A round finished.
    RoundEnded(RoundEnded),
    /// The stage changed.
    StageChanged(StageChanged),
    /// The auction checkpoint was reached.
    AuctionCheckpointReached(AuctionCheckpointReached),
    /// The distinguished participant was renamed.
    ParticipantRenamed(ParticipantRenamed),
    /// The winner was declared.
    WinnerDeclared(WinnerDeclared),
}

impl GameEventKind {
    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RosterLoaded(_) => "game.roster_loaded",
            Self::RoundStarted(_) => "game.round_started",
            Self::ParticipantEliminated(_) => "game.participant_eliminated",
            Self::RoundEnded(_) => "game.round_ended",
            Self::StageChanged(_) => "game.stage_changed",
            Self::AuctionCheckpointReached(_) => "game.auction_checkpoint_reached",
            Self::ParticipantRenamed(_) => "game.participant_renamed",
            Self::WinnerDeclared(_) => "game.winner_declared",
        }
    }
}

/// Domain event envelope for the scheduler context.
#[derive(Debug, Clone)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
