//! Query handlers for the scheduler context.
//!
//! Read-only views of the game for the front end.

use std::sync::Mutex;

use bowlout_core::aggregate::AggregateRoot;
use bowlout_core::error::GameError;
use bowlout_core::participant::{Participant, ParticipantId};
use bowlout_core::stage::Stage;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::Game;

/// One line of the wicket list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WicketLine {
    /// Wicket ordinal.
    pub wicket: u32,
    /// The eliminated participant's number.
    pub participant_id: ParticipantId,
    /// Name at the time of elimination.
    pub display_name: String,
}

/// Read-only view of the scoreboard.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreboardView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Current stage.
    pub stage: Stage,
    /// Participants on the roster.
    pub total: usize,
    /// Participants still alive.
    pub remaining: usize,
    /// Eliminations since the last counter reset.
    pub wickets: u32,
    /// Rounds finished.
    pub rounds_played: u32,
    /// Whether a round is in flight.
    pub round_in_progress: bool,
    /// Size of the next round, if one can start.
    pub next_batch: Option<usize>,
    /// The winner, once declared.
    pub winner: Option<Participant>,
    /// Wicket list since the last counter reset.
    pub wickets_list: Vec<WicketLine>,
    /// Current version (event count).
    pub version: i64,
}

impl ScoreboardView {
    /// Whether the advance trigger should be enabled.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        !self.round_in_progress && self.stage.accepts_rounds() && self.remaining > 0
    }

    /// Label for the advance trigger.
    #[must_use]
    pub fn advance_label(&self) -> String {
        if self.winner.is_some() {
            return "WINNER FOUND!".to_owned();
        }
        if self.remaining == 0 {
            return "Game Over!".to_owned();
        }
        if self.stage == Stage::AuctionPending {
            return "Auction in progress".to_owned();
        }
        if self.round_in_progress {
            return "Bowling...".to_owned();
        }
        match self.next_batch {
            Some(batch) => format!("Bowl Ball (Next: {batch} out)"),
            None => "Declare Winner".to_owned(),
        }
    }
}

/// Builds the scoreboard view of `game`.
///
/// # Errors
///
/// Returns `GameError::Infrastructure` if the game mutex is poisoned.
pub fn get_scoreboard(game: &Mutex<Game>) -> Result<ScoreboardView, GameError> {
    let game = game
        .lock()
        .map_err(|e| GameError::Infrastructure(format!("game mutex poisoned: {e}")))?;
    Ok(scoreboard_of(&game))
}

/// Builds the scoreboard view of an already-borrowed game.
#[must_use]
pub fn scoreboard_of(game: &Game) -> ScoreboardView {
    ScoreboardView {
        game_id: game.aggregate_id(),
        stage: game.stage(),
        total: game.roster().len(),
        remaining: game.roster().alive_count(),
        wickets: game.wickets(),
        rounds_played: game.rounds_played(),
        round_in_progress: game.is_busy(),
        next_batch: game.next_batch_size(),
        winner: game.winner().cloned(),
        wickets_list: game
            .scoreboard()
            .iter()
            .map(|entry| WicketLine {
                wicket: entry.wicket,
                participant_id: entry.participant.id,
                display_name: entry.participant.display_name.clone(),
            })
            .collect(),
        version: game.version(),
    }
}
