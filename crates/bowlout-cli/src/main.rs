//! Bowlout terminal game entry point.

use std::error::Error;
use std::sync::{Arc, Mutex};

use bowlout_core::rng::{DeterministicRng, SystemRng};
use bowlout_core::time::{SystemClock, TokioTicker};
use bowlout_scheduler::application::command_handlers::{RoundReport, handle_advance_round};
use bowlout_scheduler::application::query_handlers::get_scoreboard;
use bowlout_scheduler::application::services::GameServices;
use bowlout_scheduler::domain::aggregates::Game;
use bowlout_scheduler::domain::commands::AdvanceRound;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::session::{open_roster, reload};
use crate::terminal::{Action, LineInput, TerminalSink, parse_action};

mod config;
mod error;
mod session;
mod terminal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so they never interleave with the game on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Bowlout");

    let config = Config::from_env()?;
    info!(?config, "configuration loaded");

    run(config).await?;
    Ok(())
}

async fn run(config: Config) -> Result<(), AppError> {
    let input = Arc::new(LineInput::stdin());
    let sink = Arc::new(TerminalSink::stdout(Arc::clone(&input), config.autoplay));

    let rng = match config.seed {
        Some(seed) => SystemRng::seeded(seed),
        None => SystemRng::from_os(),
    };
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let services = GameServices::new(
        Arc::new(SystemClock),
        rng,
        Arc::new(TokioTicker::scaled(config.pace_scale)),
        sink.clone(),
    );
    let game = Mutex::new(Game::new(Uuid::new_v4()));

    open_roster(&game, &services, &sink, &config).await?;

    loop {
        let view = get_scoreboard(&game)?;
        sink.status(&view);

        let action = if config.autoplay {
            if !view.can_advance() {
                break;
            }
            Action::Bowl
        } else {
            sink.say(if view.can_advance() {
                "[Enter] bowl | load <file> | quit"
            } else {
                "load <file> | quit"
            });
            let Some(line) = input.read_line().await? else {
                break;
            };
            let Some(action) = parse_action(&line) else {
                sink.say("Unknown command.");
                continue;
            };
            action
        };

        match action {
            Action::Quit => break,
            Action::Bowl if !view.can_advance() => sink.say("Nothing to bowl."),
            Action::Bowl => {
                let command = AdvanceRound {
                    correlation_id: Uuid::new_v4(),
                };
                match handle_advance_round(&command, &game, &services).await? {
                    RoundReport::Rejected => sink.say("A round is already in progress."),
                    RoundReport::Exhausted => sink.say("Nobody left to bowl at."),
                    report => debug!(?report, "round finished"),
                }
            }
            Action::Load(path) => reload(&game, &services, &sink, &path).await?,
        }
    }

    info!("Bowlout finished");
    Ok(())
}
