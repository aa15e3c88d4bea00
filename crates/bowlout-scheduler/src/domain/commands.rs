//! Commands for the scheduler context.

use bowlout_core::command::Command;
use bowlout_core::sink::AuctionDecision;
use uuid::Uuid;

/// Where a new roster comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSource {
    /// `name,number` text, as uploaded.
    Text(String),
    /// The default roster `Player 1` .. `Player n`.
    Numbered(u32),
}

/// Command to replace the roster and reset the game.
#[derive(Debug, Clone)]
pub struct LoadRoster {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Roster to load.
    pub source: RosterSource,
}

impl Command for LoadRoster {
    fn command_type(&self) -> &'static str {
        "game.load_roster"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to run the next elimination round.
#[derive(Debug, Clone)]
pub struct AdvanceRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for AdvanceRound {
    fn command_type(&self) -> &'static str {
        "game.advance_round"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to settle the auction checkpoint.
#[derive(Debug, Clone)]
pub struct ResolveAuction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The decision collected from the front end.
    pub decision: AuctionDecision,
}

impl Command for ResolveAuction {
    fn command_type(&self) -> &'static str {
        "game.resolve_auction"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
