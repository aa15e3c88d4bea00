//! Command handlers for the scheduler context.
//!
//! Each handler locks the game only around a synchronous domain call,
//! drains the events that call recorded, and forwards them to the
//! presentation sink after the lock is released. No lock is ever held
//! across an await point, so ticks, auction decisions, and new round
//! requests interleave safely on one task.

use std::sync::Mutex;

use bowlout_core::aggregate::AggregateRoot;
use bowlout_core::command::Command;
use bowlout_core::error::GameError;
use bowlout_core::event::DomainEvent;
use bowlout_core::participant::Participant;
use bowlout_core::rng::DeterministicRng;
use bowlout_core::sink::PresentationSink;
use bowlout_core::stage::Stage;
use bowlout_core::time::Clock;
use bowlout_roster::domain::ingest::{RejectedRow, parse_roster};
use bowlout_roster::domain::roster::Roster;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::services::GameServices;
use crate::domain::aggregates::{Game, RoundStart, TickOutcome};
use crate::domain::commands::{AdvanceRound, LoadRoster, ResolveAuction, RosterSource};
use crate::domain::events::{GameEvent, GameEventKind};
use crate::domain::round::Round;

/// Outcome of an `AdvanceRound` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundReport {
    /// A round ran to completion.
    Completed {
        /// The round as planned.
        round: Round,
        /// Participants eliminated, in order.
        eliminated: Vec<Participant>,
        /// Stage after the round (and after the auction, if one was held).
        stage: Stage,
        /// Winner, if the round decided the game.
        winner: Option<Participant>,
    },
    /// Only one participant was left; it was crowned without a round.
    Crowned(Participant),
    /// The current stage does not accept rounds.
    Blocked(Stage),
    /// Another round was already in flight; the request was ignored.
    Rejected,
    /// Nobody was left to eliminate.
    Exhausted,
}

/// Outcome of a `LoadRoster` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Participants on the new roster.
    pub accepted: usize,
    /// Rows dropped during ingestion.
    pub rejected: Vec<RejectedRow>,
}

fn lock_game(game: &Mutex<Game>) -> Result<std::sync::MutexGuard<'_, Game>, GameError> {
    game.lock()
        .map_err(|e| GameError::Infrastructure(format!("game mutex poisoned: {e}")))
}

/// Runs one synchronous domain step and drains the events it recorded.
///
/// The outer `Result` is a lock failure; the inner one is the step's own
/// outcome, returned alongside any events recorded before it failed.
fn step<T>(
    game: &Mutex<Game>,
    services: &GameServices,
    action: impl FnOnce(&mut Game, &dyn Clock, &mut dyn DeterministicRng) -> Result<T, GameError>,
) -> Result<(Result<T, GameError>, Vec<GameEvent>), GameError> {
    let mut game = lock_game(game)?;
    let mut rng = services
        .rng
        .lock()
        .map_err(|e| GameError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;

    let outcome = action(&mut game, services.clock.as_ref(), &mut *rng);
    let events = game.take_uncommitted_events();
    Ok((outcome, events))
}

/// Maps a benign domain error to the report the caller sees.
fn benign_report(err: &GameError) -> RoundReport {
    if *err == GameError::ConcurrentRoundRejected {
        debug!("round already in progress, request ignored");
        RoundReport::Rejected
    } else {
        warn!("no participants left to eliminate");
        RoundReport::Exhausted
    }
}

/// Forwards recorded events to the sink, in order.
async fn dispatch(events: &[GameEvent], sink: &dyn PresentationSink) {
    for event in events {
        debug!(
            event_type = event.event_type(),
            sequence_number = event.metadata.sequence_number,
            payload = %event.to_payload(),
            "game event"
        );
        match &event.kind {
            GameEventKind::RosterLoaded(payload) => {
                sink.on_roster_loaded(&payload.participants).await;
            }
            GameEventKind::RoundStarted(payload) => {
                sink.on_round_start(payload.round.batch_size, payload.round.delay_ms)
                    .await;
            }
            GameEventKind::ParticipantEliminated(payload) => {
                sink.on_eliminate(&payload.participant, &payload.message, payload.display_ms)
                    .await;
            }
            GameEventKind::RoundEnded(_) => sink.on_round_end().await,
            GameEventKind::StageChanged(payload) => {
                info!(from = %payload.from, to = %payload.to, "stage changed");
                sink.on_stage_change(payload.to).await;
            }
            GameEventKind::WinnerDeclared(payload) => {
                info!(winner = %payload.participant.id, name = %payload.participant.display_name, "winner declared");
                sink.on_winner(&payload.participant).await;
            }
            // The auction loop asks the sink directly.
            GameEventKind::AuctionCheckpointReached(_) | GameEventKind::ParticipantRenamed(_) => {}
        }
    }
}

/// Handles the `LoadRoster` command: parses or builds the roster, then
/// replaces the current one and resets the game.
///
/// Parsing happens before the game is touched, so a source with no valid
/// rows leaves the previous roster in place.
///
/// # Errors
///
/// Returns `GameError::InvalidInput` if the source has no valid rows, and
/// `GameError::Validation` if a round is in flight.
#[instrument(
    skip_all,
    fields(command = command.command_type(), correlation_id = %command.correlation_id())
)]
pub async fn handle_load_roster(
    command: &LoadRoster,
    game: &Mutex<Game>,
    services: &GameServices,
) -> Result<LoadReport, GameError> {
    let (roster, rejected) = match &command.source {
        RosterSource::Text(text) => {
            let ingested = parse_roster(text)?;
            (ingested.roster, ingested.rejected)
        }
        RosterSource::Numbered(count) => (Roster::numbered(*count)?, Vec::new()),
    };
    let accepted = roster.len();

    let (outcome, events) = step(game, services, |game, clock, _rng| {
        game.load_roster(roster, command.correlation_id, clock)
    })?;
    dispatch(&events, services.sink.as_ref()).await;
    outcome?;

    info!(accepted, rejected = rejected.len(), "roster loaded");
    Ok(LoadReport { accepted, rejected })
}

/// Handles the `AdvanceRound` command: plans a round, bowls it one tick at a
/// time, and runs the auction if the round ended on the checkpoint.
///
/// A request while another round is in flight is ignored and reported as
/// `RoundReport::Rejected`; an empty field is reported as
/// `RoundReport::Exhausted`.
///
/// # Errors
///
/// Returns `GameError::Infrastructure` if a lock is poisoned.
#[instrument(
    skip_all,
    fields(command = command.command_type(), correlation_id = %command.correlation_id())
)]
pub async fn handle_advance_round(
    command: &AdvanceRound,
    game: &Mutex<Game>,
    services: &GameServices,
) -> Result<RoundReport, GameError> {
    let correlation_id = command.correlation_id;

    let (start, events) = step(game, services, |game, clock, rng| {
        game.start_round(correlation_id, clock, rng)
    })?;
    dispatch(&events, services.sink.as_ref()).await;

    let round = match start {
        Ok(RoundStart::Started(round)) => round,
        Ok(RoundStart::Crowned(winner)) => return Ok(RoundReport::Crowned(winner)),
        Ok(RoundStart::Blocked(stage)) => {
            debug!(%stage, "stage does not accept rounds");
            return Ok(RoundReport::Blocked(stage));
        }
        Err(e) if e.is_benign() => return Ok(benign_report(&e)),
        Err(e) => return Err(e),
    };

    info!(
        round = round.number,
        batch_size = round.batch_size,
        delay_ms = round.delay_ms,
        protected = ?round.protected_id,
        "round started"
    );

    let mut eliminated = Vec::with_capacity(round.batch_size);
    loop {
        services.ticker.wait(round.delay()).await;

        let (tick, events) = step(game, services, |game, clock, rng| {
            game.eliminate_next(correlation_id, clock, rng)
        })?;
        eliminated.extend(events.iter().filter_map(|event| match &event.kind {
            GameEventKind::ParticipantEliminated(payload) => Some(payload.participant.clone()),
            _ => None,
        }));
        dispatch(&events, services.sink.as_ref()).await;

        match tick {
            Ok(TickOutcome::Continue) => {}
            Ok(TickOutcome::Finished) => break,
            Err(e) if e.is_benign() => return Ok(benign_report(&e)),
            Err(e) => return Err(e),
        }
    }

    let stage = lock_game(game)?.stage();
    if stage == Stage::AuctionPending {
        run_auction(correlation_id, game, services).await?;
    }

    let (stage, winner) = {
        let game = lock_game(game)?;
        (game.stage(), game.winner().cloned())
    };
    info!(round = round.number, eliminated = eliminated.len(), %stage, "round finished");

    Ok(RoundReport::Completed {
        round,
        eliminated,
        stage,
        winner,
    })
}

/// Handles the `ResolveAuction` command.
///
/// # Errors
///
/// Returns `GameError::AuctionIncomplete` for a blank confirmation and
/// `GameError::Validation` if the game is not paused for the auction.
#[instrument(
    skip_all,
    fields(command = command.command_type(), correlation_id = %command.correlation_id())
)]
pub async fn handle_resolve_auction(
    command: &ResolveAuction,
    game: &Mutex<Game>,
    services: &GameServices,
) -> Result<(), GameError> {
    let (outcome, events) = step(game, services, |game, clock, _rng| {
        game.resolve_auction(&command.decision, command.correlation_id, clock)
    })?;
    dispatch(&events, services.sink.as_ref()).await;
    outcome
}

/// Asks the sink for the auction decision until it gives a usable one.
async fn run_auction(
    correlation_id: Uuid,
    game: &Mutex<Game>,
    services: &GameServices,
) -> Result<(), GameError> {
    loop {
        let candidates = lock_game(game)?.auction_candidates();
        info!(candidates = candidates.len(), "auction checkpoint reached");

        let decision = services.sink.on_auction_checkpoint(&candidates).await;
        let command = ResolveAuction {
            correlation_id,
            decision,
        };
        match handle_resolve_auction(&command, game, services).await {
            Ok(()) => return Ok(()),
            Err(GameError::AuctionIncomplete) => {
                info!("auction confirmed without a name, asking again");
            }
            Err(e) => return Err(e),
        }
    }
}
