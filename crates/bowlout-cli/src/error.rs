//! Bowlout CLI — error types.

use bowlout_core::error::GameError;
use thiserror::Error;

/// Startup and runtime errors for the terminal front end.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading the roster file or the terminal failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The game rejected an operation.
    #[error(transparent)]
    Game(#[from] GameError),
}
