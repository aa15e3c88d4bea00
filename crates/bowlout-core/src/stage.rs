//! Game stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// More than ten participants remain; eliminations happen in batches.
    Bulk,
    /// Ten or fewer remain; one elimination per round.
    FinalTen,
    /// Paused at exactly ten participants, waiting for the auction decision.
    AuctionPending,
    /// One participant remains and is being crowned.
    FinalSingle,
    /// Terminal.
    Complete,
}

impl Stage {
    /// Returns `true` for stages in which a round may be started.
    #[must_use]
    pub fn accepts_rounds(self) -> bool {
        matches!(self, Self::Bulk | Self::FinalTen)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bulk => "bulk",
            Self::FinalTen => "final_ten",
            Self::AuctionPending => "auction_pending",
            Self::FinalSingle => "final_single",
            Self::Complete => "complete",
        };
        f.write_str(name)
    }
}
