//! Domain error types.

use thiserror::Error;

/// Top-level error type for game operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// A roster source produced no usable participants.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An elimination was requested with nobody left alive.
    #[error("no participants left to eliminate")]
    ExhaustedPool,

    /// A round was requested while another round is still in flight.
    #[error("a round is already in progress")]
    ConcurrentRoundRejected,

    /// The auction was confirmed without a winner name.
    #[error("auction winner name must not be empty")]
    AuctionIncomplete,

    /// An operation was invoked in a stage that does not allow it.
    #[error("validation error: {0}")]
    Validation(String),

    /// A lock, I/O, or other adapter-level failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl GameError {
    /// Returns `true` for conditions callers treat as benign outcomes rather
    /// than failures.
    #[must_use]
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::ExhaustedPool | Self::ConcurrentRoundRejected)
    }
}
