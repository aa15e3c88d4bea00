//! Whole-game runs through the command handlers.

use std::sync::{Arc, Mutex};

use bowlout_core::participant::ParticipantId;
use bowlout_core::rng::{DeterministicRng, SystemRng};
use bowlout_core::sink::AuctionDecision;
use bowlout_core::stage::Stage;
use bowlout_scheduler::application::command_handlers::{
    RoundReport, handle_advance_round, handle_load_roster,
};
use bowlout_scheduler::application::query_handlers::get_scoreboard;
use bowlout_scheduler::application::services::GameServices;
use bowlout_scheduler::domain::aggregates::Game;
use bowlout_scheduler::domain::commands::{AdvanceRound, LoadRoster, RosterSource};
use bowlout_test_support::{InstantTicker, RecordingSink, SinkCall, fixed_clock};
use uuid::Uuid;

struct Table {
    game: Mutex<Game>,
    services: GameServices,
    sink: Arc<RecordingSink>,
}

fn table(seed: u64, sink: RecordingSink) -> Table {
    let sink = Arc::new(sink);
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
        Arc::new(Mutex::new(SystemRng::seeded(seed)));
    let services = GameServices::new(
        Arc::new(fixed_clock()),
        rng,
        Arc::new(InstantTicker::new()),
        sink.clone(),
    );
    Table {
        game: Mutex::new(Game::new(Uuid::new_v4())),
        services,
        sink,
    }
}

async fn load(table: &Table, source: RosterSource) {
    let command = LoadRoster {
        correlation_id: Uuid::new_v4(),
        source,
    };
    handle_load_roster(&command, &table.game, &table.services)
        .await
        .unwrap();
}

async fn advance(table: &Table) -> RoundReport {
    let command = AdvanceRound {
        correlation_id: Uuid::new_v4(),
    };
    handle_advance_round(&command, &table.game, &table.services)
        .await
        .unwrap()
}

/// Advances until the game is decided; returns the number of rounds played.
async fn play_out(table: &Table, max_rounds: usize) -> usize {
    for played in 1..=max_rounds {
        match advance(table).await {
            RoundReport::Completed {
                winner: Some(_), ..
            }
            | RoundReport::Crowned(_) => return played,
            RoundReport::Completed { .. } => {}
            other => panic!("unexpected report {other:?}"),
        }
    }
    panic!("game not decided within {max_rounds} rounds");
}

#[tokio::test]
async fn test_every_field_size_ends_with_one_winner() {
    for size in 2..=150 {
        let table = table(u64::from(size), RecordingSink::new());
        load(&table, RosterSource::Numbered(size)).await;

        play_out(&table, 200).await;

        let view = get_scoreboard(&table.game).unwrap();
        assert_eq!(view.remaining, 1, "size {size}");
        assert_eq!(view.stage, Stage::Complete);
        assert_eq!(
            table.sink.count(|call| matches!(call, SinkCall::Winner(_))),
            1,
            "size {size}"
        );

        let auctions = table
            .sink
            .count(|call| matches!(call, SinkCall::AuctionCheckpoint(_)));
        let expected = usize::from(size > 10);
        assert_eq!(auctions, expected, "size {size}");
    }
}

#[tokio::test]
async fn test_auction_fires_when_alive_count_first_hits_ten() {
    for seed in 0..20 {
        let table = table(seed, RecordingSink::new());
        load(&table, RosterSource::Numbered(137)).await;

        play_out(&table, 200).await;

        let calls = table.sink.calls();
        let checkpoint = calls
            .iter()
            .position(|call| matches!(call, SinkCall::AuctionCheckpoint(_)))
            .unwrap();
        let eliminated_before = calls[..checkpoint]
            .iter()
            .filter(|call| matches!(call, SinkCall::Eliminate { .. }))
            .count();
        assert_eq!(137 - eliminated_before, 10);
    }
}

#[tokio::test]
async fn test_distinguished_survives_bulk_and_wins_auction_name() {
    let sink = RecordingSink::with_auction(vec![AuctionDecision::Confirm("Top Bidder".to_owned())]);
    let table = table(31, sink);
    load(&table, RosterSource::Numbered(500)).await;

    play_out(&table, 200).await;

    let calls = table.sink.calls();
    let checkpoint = calls
        .iter()
        .position(|call| matches!(call, SinkCall::AuctionCheckpoint(_)))
        .unwrap();
    let bulk_victims: Vec<ParticipantId> = calls[..checkpoint]
        .iter()
        .filter_map(|call| match call {
            SinkCall::Eliminate { participant, .. } => Some(participant.id),
            _ => None,
        })
        .collect();
    assert_eq!(bulk_victims.len(), 490);
    assert!(!bulk_victims.contains(&ParticipantId::DISTINGUISHED));

    let game = table.game.lock().unwrap();
    let distinguished = game.roster().get(ParticipantId::DISTINGUISHED).unwrap();
    assert_eq!(distinguished.display_name, "Top Bidder");
}

#[tokio::test]
async fn test_finale_messages_never_repeat_within_final_nine() {
    let table = table(77, RecordingSink::new());
    load(&table, RosterSource::Numbered(64)).await;

    play_out(&table, 200).await;

    let finale: Vec<(String, u64)> = table
        .sink
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            SinkCall::Eliminate {
                participant: _,
                message,
                display_ms,
            } => Some((message, display_ms)),
            _ => None,
        })
        .rev()
        .take(9)
        .collect();
    let mut messages: Vec<&str> = finale.iter().map(|(m, _)| m.as_str()).collect();
    messages.sort_unstable();
    messages.dedup();
    assert_eq!(messages.len(), 9);
    assert!(finale.iter().all(|(_, ms)| *ms == 10_000));
}

#[tokio::test]
async fn test_reload_mid_game_starts_over() {
    let table = table(5, RecordingSink::new());
    load(&table, RosterSource::Numbered(80)).await;
    advance(&table).await;
    advance(&table).await;

    load(
        &table,
        RosterSource::Text("name,number\nAda,1\nBob,2\nCleo,3".to_owned()),
    )
    .await;

    let view = get_scoreboard(&table.game).unwrap();
    assert_eq!(view.total, 3);
    assert_eq!(view.remaining, 3);
    assert_eq!(view.wickets, 0);
    assert_eq!(view.rounds_played, 0);
    assert_eq!(view.stage, Stage::FinalTen);
    assert_eq!(play_out(&table, 5).await, 2);
}
