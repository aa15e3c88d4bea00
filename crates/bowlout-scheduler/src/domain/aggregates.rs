//! Aggregate root for an elimination game.

use std::collections::VecDeque;

use bowlout_core::aggregate::AggregateRoot;
use bowlout_core::error::GameError;
use bowlout_core::event::EventMetadata;
use bowlout_core::participant::{Participant, ParticipantId};
use bowlout_core::rng::{DeterministicRng, sample_without_replacement};
use bowlout_core::sink::AuctionDecision;
use bowlout_core::stage::Stage;
use bowlout_core::time::Clock;
use bowlout_narrative::domain::narrator::DismissalNarrator;
use bowlout_roster::domain::roster::Roster;
use tracing::debug;
use uuid::Uuid;

use super::events::{
    AuctionCheckpointReached, GameEvent, GameEventKind, ParticipantEliminated,
    ParticipantRenamed, RosterLoaded, RoundEnded, RoundStarted, StageChanged, WinnerDeclared,
};
use super::pacing::{FINAL_STAGE_SIZE, Pace, clamp_batch, pace};
use super::round::Round;

/// Result of asking the game to start a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundStart {
    /// A round was planned and is now in flight.
    Started(Round),
    /// Only one participant was left; it was crowned without a round.
    Crowned(Participant),
    /// The current stage does not accept rounds.
    Blocked(Stage),
}

/// Result of a single elimination tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// More targets remain in this round.
    Continue,
    /// The round is over.
    Finished,
}

/// One line of the wicket list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreboardEntry {
    /// Wicket ordinal since the last counter reset.
    pub wicket: u32,
    /// The eliminated participant.
    pub participant: Participant,
}

/// The round currently being bowled.
#[derive(Debug, Clone)]
pub(crate) struct ActiveRound {
    pub round: Round,
    pub targets: VecDeque<ParticipantId>,
    pub eliminated: usize,
}

/// The aggregate root for a game.
#[derive(Debug)]
pub struct Game {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Participants and their status.
    pub(crate) roster: Roster,
    /// Current stage.
    pub(crate) stage: Stage,
    /// Eliminations since the last counter reset.
    pub(crate) wickets: u32,
    /// Rounds finished since the roster was loaded.
    pub(crate) rounds_played: u32,
    /// Whether the auction checkpoint has been reached for this roster.
    pub(crate) auction_held: bool,
    /// Winner, once declared.
    pub(crate) winner: Option<ParticipantId>,
    /// Wicket list since the last counter reset.
    pub(crate) scoreboard: Vec<ScoreboardEntry>,
    /// Round in flight, if any. Doubles as the busy flag.
    pub(crate) active_round: Option<ActiveRound>,
    narrator: DismissalNarrator,
    /// Events recorded since the last drain.
    uncommitted_events: Vec<GameEvent>,
}

impl Game {
    /// Creates a game with an empty roster.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            roster: Roster::default(),
            stage: Stage::Bulk,
            wickets: 0,
            rounds_played: 0,
            auction_held: false,
            winner: None,
            scoreboard: Vec::new(),
            active_round: None,
            narrator: DismissalNarrator::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Creates a game and loads `roster` into it.
    #[must_use]
    pub fn with_roster(id: Uuid, roster: Roster, correlation_id: Uuid, clock: &dyn Clock) -> Self {
        let mut game = Self::new(id);
        game.install_roster(&roster, correlation_id, clock);
        game
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Participants and their status.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Eliminations since the last counter reset.
    #[must_use]
    pub fn wickets(&self) -> u32 {
        self.wickets
    }

    /// Rounds finished since the roster was loaded.
    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Wicket list since the last counter reset.
    #[must_use]
    pub fn scoreboard(&self) -> &[ScoreboardEntry] {
        &self.scoreboard
    }

    /// The declared winner, if any.
    #[must_use]
    pub fn winner(&self) -> Option<&Participant> {
        self.winner.and_then(|id| self.roster.get(id))
    }

    /// The round in flight, if any.
    #[must_use]
    pub fn active_round(&self) -> Option<&Round> {
        self.active_round.as_ref().map(|active| &active.round)
    }

    /// Returns `true` while a round is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.active_round.is_some()
    }

    /// The alive participants offered at the auction checkpoint.
    #[must_use]
    pub fn auction_candidates(&self) -> Vec<Participant> {
        self.roster.alive_list().into_iter().cloned().collect()
    }

    /// Size of the next round, or `None` if no round can start now.
    #[must_use]
    pub fn next_batch_size(&self) -> Option<usize> {
        let remaining = self.roster.alive_count();
        if self.is_busy() || !self.stage.accepts_rounds() || remaining < 2 {
            return None;
        }
        let protected = self.protected_participant().is_some();
        Some(clamp_batch(self.current_pace().batch_size, remaining, protected))
    }

    /// Replaces the roster and resets every per-game counter.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` while a round is in flight or the
    /// game is paused for the auction.
    pub fn load_roster(
        &mut self,
        roster: Roster,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), GameError> {
        if self.is_busy() {
            return Err(GameError::Validation(
                "cannot load a roster while a round is in progress".to_owned(),
            ));
        }
        if self.stage == Stage::AuctionPending {
            return Err(GameError::Validation(
                "cannot load a roster while the auction is pending".to_owned(),
            ));
        }

        self.install_roster(&roster, correlation_id, clock);
        Ok(())
    }

    /// Records the new roster. A field of ten or fewer goes straight to the
    /// final stage.
    fn install_roster(&mut self, roster: &Roster, correlation_id: Uuid, clock: &dyn Clock) {
        self.record(
            GameEventKind::RosterLoaded(RosterLoaded {
                participants: roster.participants().to_vec(),
            }),
            correlation_id,
            clock,
        );
        if roster.alive_count() <= FINAL_STAGE_SIZE {
            self.change_stage(Stage::FinalTen, correlation_id, clock);
        }
    }

    /// Plans the next round and marks the game busy.
    ///
    /// In bulk play the distinguished participant is left out of the draw
    /// while more than ten remain. Targets are drawn up front, uniformly
    /// and without replacement.
    ///
    /// # Errors
    ///
    /// Returns `GameError::ConcurrentRoundRejected` if a round is already in
    /// flight, and `GameError::ExhaustedPool` if nobody is alive.
    pub fn start_round(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<RoundStart, GameError> {
        if self.is_busy() {
            return Err(GameError::ConcurrentRoundRejected);
        }
        if !self.stage.accepts_rounds() {
            return Ok(RoundStart::Blocked(self.stage));
        }

        let remaining = self.roster.alive_count();
        if remaining == 0 {
            return Err(GameError::ExhaustedPool);
        }
        if remaining == 1 {
            let winner = self
                .crown(correlation_id, clock)
                .ok_or(GameError::ExhaustedPool)?;
            return Ok(RoundStart::Crowned(winner));
        }

        let protected_id = self.protected_participant();
        let pace = self.current_pace();
        let batch_size = clamp_batch(pace.batch_size, remaining, protected_id.is_some());

        let candidates: Vec<ParticipantId> = self
            .roster
            .alive_ids()
            .into_iter()
            .filter(|id| Some(*id) != protected_id)
            .collect();
        let targets = sample_without_replacement(rng, &candidates, batch_size);

        let round = Round {
            number: self.rounds_played + 1,
            remaining_before: remaining,
            batch_size,
            delay_ms: pace.delay_ms,
            protected_id,
        };

        self.record(
            GameEventKind::RoundStarted(RoundStarted {
                round: round.clone(),
                targets,
            }),
            correlation_id,
            clock,
        );
        Ok(RoundStart::Started(round))
    }

    /// Performs one elimination of the round in flight.
    ///
    /// Alive counts are re-read on every tick. If the elimination leaves a
    /// single participant, the game is decided at once even if the batch had
    /// more targets. A bulk round that ends on exactly ten participants
    /// pauses the game for the auction.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if no round is in flight, and
    /// `GameError::ExhaustedPool` if nobody is alive.
    pub fn eliminate_next(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<TickOutcome, GameError> {
        let Some(active) = self.active_round.as_ref() else {
            return Err(GameError::Validation("no round in progress".to_owned()));
        };

        let remaining = self.roster.alive_count();
        if remaining == 0 {
            self.end_round(correlation_id, clock);
            return Err(GameError::ExhaustedPool);
        }

        let target = active
            .targets
            .iter()
            .copied()
            .find(|id| self.roster.is_alive(*id));
        let Some(mut participant) = target.and_then(|id| self.roster.get(id)).cloned() else {
            return Ok(self.finish_round(correlation_id, clock));
        };

        let remaining_after = remaining - 1;
        let dismissal = self.narrator.next(remaining_after, rng);
        participant.alive = false;
        debug!(
            participant = %participant.id,
            remaining_after,
            message = dismissal.message,
            "participant eliminated"
        );

        self.record(
            GameEventKind::ParticipantEliminated(ParticipantEliminated {
                participant,
                wicket: self.wickets + 1,
                remaining_after,
                message: dismissal.message.to_owned(),
                display_ms: dismissal.display_ms,
            }),
            correlation_id,
            clock,
        );

        if remaining_after <= 1 {
            if self.crown(correlation_id, clock).is_none() {
                self.end_round(correlation_id, clock);
            }
            return Ok(TickOutcome::Finished);
        }

        if self
            .active_round
            .as_ref()
            .is_some_and(|active| active.targets.is_empty())
        {
            return Ok(self.finish_round(correlation_id, clock));
        }
        Ok(TickOutcome::Continue)
    }

    /// Settles the auction checkpoint and moves to the final ten.
    ///
    /// A confirmed name overwrites the distinguished participant's display
    /// name; a skip leaves every name alone.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Validation` if the game is not paused for the
    /// auction, and `GameError::AuctionIncomplete` if a confirmation carries
    /// a blank name.
    pub fn resolve_auction(
        &mut self,
        decision: &AuctionDecision,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), GameError> {
        if self.stage != Stage::AuctionPending {
            return Err(GameError::Validation(format!(
                "auction is not pending (stage: {})",
                self.stage
            )));
        }

        if let AuctionDecision::Confirm(name) = decision {
            let name = name.trim();
            if name.is_empty() {
                return Err(GameError::AuctionIncomplete);
            }
            match self.roster.get(ParticipantId::DISTINGUISHED) {
                Some(participant) => {
                    let previous_name = participant.display_name.clone();
                    self.record(
                        GameEventKind::ParticipantRenamed(ParticipantRenamed {
                            participant_id: ParticipantId::DISTINGUISHED,
                            previous_name,
                            display_name: name.to_owned(),
                        }),
                        correlation_id,
                        clock,
                    );
                }
                None => debug!("no distinguished participant on roster, auction name ignored"),
            }
        }

        self.change_stage(Stage::FinalTen, correlation_id, clock);
        Ok(())
    }

    fn protected_participant(&self) -> Option<ParticipantId> {
        let shielded = self.stage == Stage::Bulk
            && self.roster.alive_count() > FINAL_STAGE_SIZE
            && self.roster.is_alive(ParticipantId::DISTINGUISHED);
        shielded.then_some(ParticipantId::DISTINGUISHED)
    }

    fn current_pace(&self) -> Pace {
        if self.stage == Stage::FinalTen {
            Pace::FINAL
        } else {
            pace(self.roster.alive_count())
        }
    }

    fn end_round(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let Some(active) = self.active_round.as_ref() else {
            return;
        };
        let ended = RoundEnded {
            round_number: active.round.number,
            eliminated: active.eliminated,
            remaining: self.roster.alive_count(),
        };
        self.record(GameEventKind::RoundEnded(ended), correlation_id, clock);
    }

    fn finish_round(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> TickOutcome {
        self.end_round(correlation_id, clock);

        let remaining = self.roster.alive_count();
        if self.stage == Stage::Bulk && remaining <= FINAL_STAGE_SIZE {
            if remaining == FINAL_STAGE_SIZE && !self.auction_held {
                self.change_stage(Stage::AuctionPending, correlation_id, clock);
                let candidates = self.auction_candidates();
                self.record(
                    GameEventKind::AuctionCheckpointReached(AuctionCheckpointReached {
                        candidates,
                    }),
                    correlation_id,
                    clock,
                );
            } else {
                self.change_stage(Stage::FinalTen, correlation_id, clock);
            }
        }
        TickOutcome::Finished
    }

    fn crown(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Option<Participant> {
        let winner = self.roster.survivor()?.clone();
        self.end_round(correlation_id, clock);
        self.change_stage(Stage::FinalSingle, correlation_id, clock);
        self.record(
            GameEventKind::WinnerDeclared(WinnerDeclared {
                participant: winner.clone(),
            }),
            correlation_id,
            clock,
        );
        self.change_stage(Stage::Complete, correlation_id, clock);
        Some(winner)
    }

    fn change_stage(&mut self, to: Stage, correlation_id: Uuid, clock: &dyn Clock) {
        let from = self.stage;
        self.record(
            GameEventKind::StageChanged(StageChanged { from, to }),
            correlation_id,
            clock,
        );
    }

    fn record(&mut self, kind: GameEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = GameEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.version + 1,
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for Game {
    type Event = GameEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            GameEventKind::RosterLoaded(payload) => {
                self.roster =
                    Roster::from_participants(payload.participants.clone()).unwrap_or_default();
                self.stage = Stage::Bulk;
                self.wickets = 0;
                self.rounds_played = 0;
                self.auction_held = false;
                self.winner = None;
                self.scoreboard.clear();
                self.active_round = None;
                self.narrator.reset();
            }
            GameEventKind::RoundStarted(payload) => {
                self.active_round = Some(ActiveRound {
                    round: payload.round.clone(),
                    targets: payload.targets.iter().copied().collect(),
                    eliminated: 0,
                });
            }
            GameEventKind::ParticipantEliminated(payload) => {
                let id = payload.participant.id;
                self.roster.eliminate(id);
                self.wickets = payload.wicket;
                self.scoreboard.push(ScoreboardEntry {
                    wicket: payload.wicket,
                    participant: payload.participant.clone(),
                });
                if let Some(active) = self.active_round.as_mut() {
                    active.targets.retain(|target| *target != id);
                    active.eliminated += 1;
                }
            }
            GameEventKind::RoundEnded(_) => {
                self.active_round = None;
                self.rounds_played += 1;
            }
            GameEventKind::StageChanged(payload) => {
                self.stage = payload.to;
                if payload.to == Stage::FinalTen {
                    self.wickets = 0;
                    self.scoreboard.clear();
                    self.narrator.reset();
                }
            }
            GameEventKind::AuctionCheckpointReached(_) => {
                self.auction_held = true;
            }
            GameEventKind::ParticipantRenamed(payload) => {
                self.roster
                    .rename(payload.participant_id, &payload.display_name);
            }
            GameEventKind::WinnerDeclared(payload) => {
                self.winner = Some(payload.participant.id);
            }
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bowlout_core::event::DomainEvent;
    use bowlout_core::rng::SystemRng;
    use bowlout_test_support::{MockRng, fixed_clock};

    fn id(n: u32) -> ParticipantId {
        ParticipantId::new(n).unwrap()
    }

    fn game_of(size: u32) -> Game {
        let roster = Roster::numbered(size).unwrap();
        Game::with_roster(Uuid::new_v4(), roster, Uuid::new_v4(), &fixed_clock())
    }

    fn started(result: Result<RoundStart, GameError>) -> Round {
        match result {
            Ok(RoundStart::Started(round)) => round,
            other => panic!("expected Started, got {other:?}"),
        }
    }

    /// Runs the round in flight to completion and returns the eliminated ids.
    fn bowl_out(game: &mut Game, rng: &mut dyn DeterministicRng) -> Vec<ParticipantId> {
        let clock = fixed_clock();
        let before: Vec<ParticipantId> = game.roster.alive_ids();
        loop {
            match game.eliminate_next(Uuid::new_v4(), &clock, rng).unwrap() {
                TickOutcome::Continue => {}
                TickOutcome::Finished => break,
            }
        }
        before
            .into_iter()
            .filter(|id| !game.roster.is_alive(*id))
            .collect()
    }

    fn event_types(game: &Game) -> Vec<&'static str> {
        game.uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect()
    }

    // --- loading ---

    #[test]
    fn test_with_roster_records_roster_loaded() {
        let correlation_id = Uuid::new_v4();
        let clock = fixed_clock();
        let game_id = Uuid::new_v4();

        let game = Game::with_roster(game_id, Roster::numbered(12).unwrap(), correlation_id, &clock);

        let events = game.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "game.roster_loaded");
        let meta = events[0].metadata();
        assert_eq!(meta.aggregate_id, game_id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, clock.0);
        assert_eq!(game.version(), 1);
        assert_eq!(game.stage(), Stage::Bulk);
    }

    #[test]
    fn test_take_uncommitted_events_drains_in_order() {
        let mut game = game_of(4);

        let drained = game.take_uncommitted_events();

        let types: Vec<&str> = drained.iter().map(DomainEvent::event_type).collect();
        assert_eq!(types, vec!["game.roster_loaded", "game.stage_changed"]);
        assert_eq!(drained[1].metadata.sequence_number, 2);
        assert!(game.uncommitted_events().is_empty());
        assert_eq!(game.version(), 2);
    }

    #[test]
    fn test_ten_or_fewer_start_in_final_ten() {
        assert_eq!(game_of(10).stage(), Stage::FinalTen);
        assert_eq!(game_of(2).stage(), Stage::FinalTen);
        assert_eq!(game_of(11).stage(), Stage::Bulk);
    }

    #[test]
    fn test_small_roster_records_stage_change_to_final_ten() {
        let game = game_of(6);

        assert_eq!(
            event_types(&game),
            vec!["game.roster_loaded", "game.stage_changed"]
        );
        match &game.uncommitted_events()[1].kind {
            GameEventKind::StageChanged(payload) => {
                assert_eq!(payload.from, Stage::Bulk);
                assert_eq!(payload.to, Stage::FinalTen);
            }
            other => panic!("expected StageChanged, got {other:?}"),
        }
    }

    #[test]
    fn test_load_roster_resets_game_state() {
        let clock = fixed_clock();
        let mut game = game_of(23);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
        bowl_out(&mut game, &mut MockRng);
        assert_eq!(game.wickets(), 8);

        game.load_roster(Roster::numbered(5).unwrap(), Uuid::new_v4(), &clock)
            .unwrap();

        assert_eq!(game.roster().len(), 5);
        assert_eq!(game.roster().alive_count(), 5);
        assert_eq!(game.wickets(), 0);
        assert_eq!(game.rounds_played(), 0);
        assert!(game.scoreboard().is_empty());
        assert_eq!(game.stage(), Stage::FinalTen);
    }

    #[test]
    fn test_load_roster_rejected_while_round_in_flight() {
        let clock = fixed_clock();
        let mut game = game_of(23);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));

        let result = game.load_roster(Roster::numbered(5).unwrap(), Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(GameError::Validation(_))));
        assert_eq!(game.roster().len(), 23);
    }

    // --- bulk rounds ---

    #[test]
    fn test_twenty_three_participants_reach_auction_in_two_rounds() {
        // Arrange
        let clock = fixed_clock();
        let mut game = game_of(23);

        // Act: round 1
        let round = started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));

        // Assert: pace(23) = 8, protected participant leaves room for it
        assert_eq!(round.remaining_before, 23);
        assert_eq!(round.batch_size, 8);
        assert_eq!(round.delay_ms, 600);
        assert_eq!(round.protected_id, Some(ParticipantId::DISTINGUISHED));
        let eliminated = bowl_out(&mut game, &mut MockRng);
        assert_eq!(eliminated.len(), 8);
        assert!(!eliminated.contains(&ParticipantId::DISTINGUISHED));
        assert_eq!(game.roster().alive_count(), 15);
        assert_eq!(game.stage(), Stage::Bulk);

        // Act: round 2
        let round = started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));

        // Assert: pace(15) lands exactly on ten
        assert_eq!(round.number, 2);
        assert_eq!(round.batch_size, 5);
        assert_eq!(round.delay_ms, 1_000);
        bowl_out(&mut game, &mut MockRng);
        assert_eq!(game.roster().alive_count(), 10);
        assert_eq!(game.stage(), Stage::AuctionPending);
        assert!(game.roster().is_alive(ParticipantId::DISTINGUISHED));
    }

    #[test]
    fn test_mock_rng_draws_in_roster_order_skipping_protected() {
        let clock = fixed_clock();
        let mut game = game_of(23);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));

        let eliminated = bowl_out(&mut game, &mut MockRng);

        assert_eq!(eliminated, (2..=9).map(id).collect::<Vec<_>>());
    }

    #[test]
    fn test_distinguished_never_eliminated_in_bulk() {
        let clock = fixed_clock();
        for seed in 0..50 {
            let mut rng = SystemRng::seeded(seed);
            let mut game = game_of(300);
            while game.stage() == Stage::Bulk {
                started(game.start_round(Uuid::new_v4(), &clock, &mut rng));
                bowl_out(&mut game, &mut rng);
                assert!(game.roster().is_alive(ParticipantId::DISTINGUISHED));
            }
            assert_eq!(game.stage(), Stage::AuctionPending);
            assert_eq!(game.roster().alive_count(), 10);
        }
    }

    #[test]
    fn test_round_events_in_order() {
        let clock = fixed_clock();
        let mut game = game_of(12);
        game.clear_uncommitted_events();

        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
        bowl_out(&mut game, &mut MockRng);

        assert_eq!(
            event_types(&game),
            vec![
                "game.round_started",
                "game.participant_eliminated",
                "game.participant_eliminated",
                "game.round_ended",
                "game.stage_changed",
                "game.auction_checkpoint_reached",
            ]
        );
    }

    #[test]
    fn test_elimination_event_carries_wicket_and_message() {
        let clock = fixed_clock();
        let mut game = game_of(12);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
        game.clear_uncommitted_events();

        game.eliminate_next(Uuid::new_v4(), &clock, &mut MockRng)
            .unwrap();

        match &game.uncommitted_events()[0].kind {
            GameEventKind::ParticipantEliminated(payload) => {
                assert_eq!(payload.participant.id, id(2));
                assert!(!payload.participant.alive);
                assert_eq!(payload.wicket, 1);
                assert_eq!(payload.remaining_after, 11);
                assert_eq!(payload.message, "Bowled!");
                assert_eq!(payload.display_ms, 2_000);
            }
            other => panic!("expected ParticipantEliminated, got {other:?}"),
        }
    }

    // --- concurrency and terminal guards ---

    #[test]
    fn test_second_start_while_busy_is_rejected() {
        let clock = fixed_clock();
        let mut game = game_of(40);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));

        let result = game.start_round(Uuid::new_v4(), &clock, &mut MockRng);

        assert_eq!(result, Err(GameError::ConcurrentRoundRejected));
        assert_eq!(game.active_round().map(|r| r.number), Some(1));
    }

    #[test]
    fn test_eliminate_without_round_is_validation_error() {
        let mut game = game_of(5);
        let result = game.eliminate_next(Uuid::new_v4(), &fixed_clock(), &mut MockRng);
        assert!(matches!(result, Err(GameError::Validation(_))));
    }

    #[test]
    fn test_empty_game_reports_exhausted_pool() {
        let mut game = Game::new(Uuid::new_v4());
        let result = game.start_round(Uuid::new_v4(), &fixed_clock(), &mut MockRng);
        assert_eq!(result, Err(GameError::ExhaustedPool));
    }

    #[test]
    fn test_exhausted_pool_mid_round_ends_round() {
        let clock = fixed_clock();
        let mut game = game_of(3);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
        for participant in game.roster.alive_ids() {
            game.roster.eliminate(participant);
        }

        let result = game.eliminate_next(Uuid::new_v4(), &clock, &mut MockRng);

        assert_eq!(result, Err(GameError::ExhaustedPool));
        assert!(!game.is_busy());
    }

    #[test]
    fn test_start_round_blocked_during_auction() {
        let clock = fixed_clock();
        let mut game = game_of(12);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
        bowl_out(&mut game, &mut MockRng);

        let result = game.start_round(Uuid::new_v4(), &clock, &mut MockRng);

        assert_eq!(result, Ok(RoundStart::Blocked(Stage::AuctionPending)));
    }

    // --- auction ---

    fn game_at_auction() -> Game {
        let clock = fixed_clock();
        let mut game = game_of(12);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
        bowl_out(&mut game, &mut MockRng);
        assert_eq!(game.stage(), Stage::AuctionPending);
        game
    }

    #[test]
    fn test_auction_confirm_renames_distinguished() {
        let mut game = game_at_auction();

        game.resolve_auction(
            &AuctionDecision::Confirm("  Big Spender ".to_owned()),
            Uuid::new_v4(),
            &fixed_clock(),
        )
        .unwrap();

        let distinguished = game.roster().get(ParticipantId::DISTINGUISHED).unwrap();
        assert_eq!(distinguished.display_name, "Big Spender");
        assert!(distinguished.alive);
        assert_eq!(game.stage(), Stage::FinalTen);
        assert_eq!(game.wickets(), 0);
        assert!(game.scoreboard().is_empty());
    }

    #[test]
    fn test_auction_skip_keeps_names() {
        let mut game = game_at_auction();

        game.resolve_auction(&AuctionDecision::Skip, Uuid::new_v4(), &fixed_clock())
            .unwrap();

        let distinguished = game.roster().get(ParticipantId::DISTINGUISHED).unwrap();
        assert_eq!(distinguished.display_name, "Player 1");
        assert_eq!(game.stage(), Stage::FinalTen);
    }

    #[test]
    fn test_auction_blank_confirm_is_incomplete() {
        let mut game = game_at_auction();

        let result = game.resolve_auction(
            &AuctionDecision::Confirm("   ".to_owned()),
            Uuid::new_v4(),
            &fixed_clock(),
        );

        assert_eq!(result, Err(GameError::AuctionIncomplete));
        assert_eq!(game.stage(), Stage::AuctionPending);
    }

    #[test]
    fn test_auction_outside_checkpoint_is_validation_error() {
        let mut game = game_of(20);
        let result = game.resolve_auction(&AuctionDecision::Skip, Uuid::new_v4(), &fixed_clock());
        match result {
            Err(GameError::Validation(msg)) => {
                assert_eq!(msg, "auction is not pending (stage: bulk)");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_load_roster_rejected_while_auction_pending() {
        let clock = fixed_clock();
        let mut game = game_at_auction();

        let result = game.load_roster(Roster::numbered(30).unwrap(), Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(GameError::Validation(_))));
        assert_eq!(game.stage(), Stage::AuctionPending);
        assert_eq!(game.roster().len(), 12);
        game.resolve_auction(&AuctionDecision::Skip, Uuid::new_v4(), &clock)
            .unwrap();
        assert_eq!(game.stage(), Stage::FinalTen);
    }

    #[test]
    fn test_protection_ends_at_checkpoint() {
        let clock = fixed_clock();
        let mut game = game_at_auction();
        game.resolve_auction(&AuctionDecision::Skip, Uuid::new_v4(), &clock)
            .unwrap();

        let round = started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
        let eliminated = bowl_out(&mut game, &mut MockRng);

        assert_eq!(round.protected_id, None);
        assert_eq!(round.batch_size, 1);
        assert_eq!(round.delay_ms, 1_200);
        assert_eq!(eliminated, vec![ParticipantId::DISTINGUISHED]);
    }

    // --- final stage ---

    #[test]
    fn test_ten_participants_play_down_to_one_winner() {
        let clock = fixed_clock();
        let mut game = game_of(10);
        let mut rounds = 0;

        while game.stage() == Stage::FinalTen {
            let round = started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
            assert_eq!(round.batch_size, 1);
            assert_eq!(bowl_out(&mut game, &mut MockRng).len(), 1);
            rounds += 1;
        }

        assert_eq!(rounds, 9);
        assert_eq!(game.stage(), Stage::Complete);
        assert_eq!(game.roster().alive_count(), 1);
        assert_eq!(game.winner().map(|p| p.id), Some(id(10)));
        let winners = game
            .uncommitted_events()
            .iter()
            .filter(|e| matches!(e.kind, GameEventKind::WinnerDeclared(_)))
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_final_stage_uses_finale_messages() {
        let clock = fixed_clock();
        let mut game = game_of(10);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
        game.clear_uncommitted_events();

        game.eliminate_next(Uuid::new_v4(), &clock, &mut MockRng)
            .unwrap();

        match &game.uncommitted_events()[0].kind {
            GameEventKind::ParticipantEliminated(payload) => {
                assert_eq!(payload.message, "Retired Hurt!");
                assert_eq!(payload.display_ms, 10_000);
            }
            other => panic!("expected ParticipantEliminated, got {other:?}"),
        }
    }

    #[test]
    fn test_complete_game_ignores_further_rounds() {
        let clock = fixed_clock();
        let mut game = game_of(2);
        started(game.start_round(Uuid::new_v4(), &clock, &mut MockRng));
        bowl_out(&mut game, &mut MockRng);
        assert_eq!(game.stage(), Stage::Complete);
        let version = game.version();

        let result = game.start_round(Uuid::new_v4(), &clock, &mut MockRng);

        assert_eq!(result, Ok(RoundStart::Blocked(Stage::Complete)));
        assert_eq!(game.version(), version);
    }

    #[test]
    fn test_single_participant_crowned_on_first_round() {
        let clock = fixed_clock();
        let mut game = game_of(1);

        let result = game.start_round(Uuid::new_v4(), &clock, &mut MockRng);

        match result {
            Ok(RoundStart::Crowned(winner)) => assert_eq!(winner.id, id(1)),
            other => panic!("expected Crowned, got {other:?}"),
        }
        assert_eq!(game.stage(), Stage::Complete);
    }

    #[test]
    fn test_next_batch_size_reflects_pacing_and_protection() {
        assert_eq!(game_of(23).next_batch_size(), Some(8));
        assert_eq!(game_of(15).next_batch_size(), Some(5));
        assert_eq!(game_of(10).next_batch_size(), Some(1));
        assert_eq!(game_of(1).next_batch_size(), None);
    }
}
