//! The roster store.

use std::collections::HashSet;

use bowlout_core::error::GameError;
use bowlout_core::participant::{Participant, ParticipantId};
use serde::Serialize;

/// Ordered participants with their alive/eliminated status.
///
/// Insertion order is display order. The alive subset is always derived from
/// the participants' own flags; there is no separate counter to drift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    /// Builds a roster from participants, all of which start alive.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidInput` if the list is empty or two
    /// participants share an id.
    pub fn from_participants(participants: Vec<Participant>) -> Result<Self, GameError> {
        if participants.is_empty() {
            return Err(GameError::InvalidInput(
                "roster must contain at least one participant".to_owned(),
            ));
        }

        let mut seen = HashSet::with_capacity(participants.len());
        for participant in &participants {
            if !seen.insert(participant.id) {
                return Err(GameError::InvalidInput(format!(
                    "duplicate participant {}",
                    participant.id
                )));
            }
        }

        let participants = participants
            .into_iter()
            .map(|p| Participant { alive: true, ..p })
            .collect();
        Ok(Self { participants })
    }

    /// Builds the default roster `Player 1` .. `Player count`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidInput` if `count` is zero.
    pub fn numbered(count: u32) -> Result<Self, GameError> {
        let participants = (1..=count)
            .filter_map(ParticipantId::new)
            .map(|id| Participant::new(id, format!("Player {}", id.get())))
            .collect();
        Self::from_participants(participants)
    }

    /// Returns all participants in display order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Total number of participants, alive or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns `true` if the roster has no participants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Looks up a participant by id.
    #[must_use]
    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Number of participants still alive.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.participants.iter().filter(|p| p.alive).count()
    }

    /// Alive participants in display order.
    #[must_use]
    pub fn alive_list(&self) -> Vec<&Participant> {
        self.participants.iter().filter(|p| p.alive).collect()
    }

    /// Ids of alive participants in display order.
    #[must_use]
    pub fn alive_ids(&self) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .filter(|p| p.alive)
            .map(|p| p.id)
            .collect()
    }

    /// Returns `true` if `id` is on the roster and still alive.
    #[must_use]
    pub fn is_alive(&self, id: ParticipantId) -> bool {
        self.get(id).is_some_and(|p| p.alive)
    }

    /// The sole survivor, once exactly one participant is alive.
    #[must_use]
    pub fn survivor(&self) -> Option<&Participant> {
        let mut alive = self.participants.iter().filter(|p| p.alive);
        let first = alive.next()?;
        alive.next().is_none().then_some(first)
    }

    /// Marks `id` eliminated. Returns `false` if it was unknown or already out.
    pub fn eliminate(&mut self, id: ParticipantId) -> bool {
        match self.participants.iter_mut().find(|p| p.id == id) {
            Some(participant) if participant.alive => {
                participant.alive = false;
                true
            }
            _ => false,
        }
    }

    /// Overwrites the display name of `id`. Returns `false` if unknown.
    pub fn rename(&mut self, id: ParticipantId, display_name: &str) -> bool {
        match self.participants.iter_mut().find(|p| p.id == id) {
            Some(participant) => {
                display_name.clone_into(&mut participant.display_name);
                true
            }
            None => false,
        }
    }
}
