//! Roster loading for the terminal session.

use std::path::Path;
use std::sync::Mutex;

use bowlout_core::error::GameError;
use bowlout_scheduler::application::command_handlers::handle_load_roster;
use bowlout_scheduler::application::services::GameServices;
use bowlout_scheduler::domain::aggregates::Game;
use bowlout_scheduler::domain::commands::{LoadRoster, RosterSource};
use tracing::warn;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::terminal::TerminalSink;

/// Loads `source`, reporting skipped rows.
///
/// # Errors
///
/// Returns whatever the load handler rejects the source with.
pub async fn load(
    game: &Mutex<Game>,
    services: &GameServices,
    sink: &TerminalSink,
    source: RosterSource,
) -> Result<(), GameError> {
    let command = LoadRoster {
        correlation_id: Uuid::new_v4(),
        source,
    };
    let report = handle_load_roster(&command, game, services).await?;
    if !report.rejected.is_empty() {
        sink.say(&format!("Skipped {} invalid row(s).", report.rejected.len()));
    }
    Ok(())
}

/// Loads the configured roster at start-up.
///
/// A roster file that cannot be read or has no valid rows is reported and
/// replaced by the numbered default roster.
///
/// # Errors
///
/// Returns `AppError::Game` only for failures other than a bad roster.
pub async fn open_roster(
    game: &Mutex<Game>,
    services: &GameServices,
    sink: &TerminalSink,
    config: &Config,
) -> Result<(), AppError> {
    let fallback = RosterSource::Numbered(config.default_size);

    let source = match config.roster_source().await {
        Ok(source) => source,
        Err(e) => {
            warn!(error = %e, "cannot read configured roster");
            sink.say(&format!(
                "Cannot read roster: {e}. Using {} numbered players.",
                config.default_size
            ));
            fallback.clone()
        }
    };

    match load(game, services, sink, source).await {
        Ok(()) => Ok(()),
        Err(e @ GameError::InvalidInput(_)) => {
            warn!(error = %e, "configured roster rejected");
            sink.say(&format!(
                "Roster rejected: {e}. Using {} numbered players.",
                config.default_size
            ));
            load(game, services, sink, fallback).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Replaces the roster from `path`. Unreadable or empty files, and loads
/// the game refuses, keep the current game.
///
/// # Errors
///
/// Returns `AppError::Game` for infrastructure failures.
pub async fn reload(
    game: &Mutex<Game>,
    services: &GameServices,
    sink: &TerminalSink,
    path: &Path,
) -> Result<(), AppError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read roster file");
            sink.say(&format!("Cannot read {}: {e}", path.display()));
            return Ok(());
        }
    };

    match load(game, services, sink, RosterSource::Text(text)).await {
        Ok(()) => Ok(()),
        Err(e @ (GameError::InvalidInput(_) | GameError::Validation(_))) => {
            warn!(path = %path.display(), error = %e, "roster rejected");
            sink.say(&format!("Roster rejected: {e}"));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use bowlout_core::rng::DeterministicRng;
    use bowlout_test_support::{InstantTicker, MockRng, fixed_clock};

    use super::*;
    use crate::terminal::LineInput;

    struct Session {
        game: Mutex<Game>,
        services: GameServices,
        sink: Arc<TerminalSink>,
    }

    fn session() -> Session {
        let sink = Arc::new(TerminalSink::new(
            Box::new(std::io::sink()),
            Arc::new(LineInput::from_reader(&b""[..])),
            true,
        ));
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        let services = GameServices::new(
            Arc::new(fixed_clock()),
            rng,
            Arc::new(InstantTicker::new()),
            sink.clone(),
        );
        Session {
            game: Mutex::new(Game::new(Uuid::new_v4())),
            services,
            sink,
        }
    }

    fn config_with_roster(path: Option<PathBuf>) -> Config {
        Config {
            roster_path: path,
            default_size: 40,
            seed: None,
            autoplay: true,
            pace_scale: 0.0,
        }
    }

    fn roster_file(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bowlout-{}.csv", Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn roster_len(session: &Session) -> usize {
        session.game.lock().unwrap().roster().len()
    }

    #[tokio::test]
    async fn test_open_roster_loads_configured_file() {
        let s = session();
        let path = roster_file("Name,Number\nAda,1\nBob,2\nCleo,3\n");

        open_roster(&s.game, &s.services, &s.sink, &config_with_roster(Some(path.clone())))
            .await
            .unwrap();

        assert_eq!(roster_len(&s), 3);
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_open_roster_without_valid_rows_falls_back_to_numbered() {
        // Arrange
        let s = session();
        let path = roster_file("Name,Number\n,1\nBob,\n");

        // Act
        let result =
            open_roster(&s.game, &s.services, &s.sink, &config_with_roster(Some(path.clone())))
                .await;

        // Assert
        assert!(result.is_ok());
        assert_eq!(roster_len(&s), 40);
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_open_roster_with_missing_file_falls_back_to_numbered() {
        let s = session();
        let missing = std::env::temp_dir().join(format!("bowlout-missing-{}.csv", Uuid::new_v4()));

        let result = open_roster(&s.game, &s.services, &s.sink, &config_with_roster(Some(missing)))
            .await;

        assert!(result.is_ok());
        assert_eq!(roster_len(&s), 40);
    }

    #[tokio::test]
    async fn test_reload_with_bad_file_keeps_current_game() {
        let s = session();
        open_roster(&s.game, &s.services, &s.sink, &config_with_roster(None))
            .await
            .unwrap();
        let path = roster_file("Name,Number\n,1\n");

        reload(&s.game, &s.services, &s.sink, &path).await.unwrap();

        assert_eq!(roster_len(&s), 40);
        std::fs::remove_file(path).unwrap();
    }
}
