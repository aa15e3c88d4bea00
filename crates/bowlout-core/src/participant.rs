//! Participant identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique positive participant number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u32);

impl ParticipantId {
    /// The distinguished participant, protected during bulk elimination and
    /// renamed by the auction.
    pub const DISTINGUISHED: Self = Self(1);

    /// Creates an id, rejecting zero.
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Returns the raw number.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Returns `true` for the distinguished participant.
    #[must_use]
    pub fn is_distinguished(self) -> bool {
        self == Self::DISTINGUISHED
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Identity within the roster.
    pub id: ParticipantId,
    /// Name shown on the scoreboard.
    pub display_name: String,
    /// Whether the participant is still in the game.
    pub alive: bool,
}

impl Participant {
    /// Creates a participant that is still in the game.
    #[must_use]
    pub fn new(id: ParticipantId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            alive: true,
        }
    }
}
