//! Roster ingestion from `name,number` text.
//!
//! One record per line. A first line containing "name" (any case) is a
//! header and is skipped. Rows with an empty name or a number that is
//! missing, unparsable, or zero are dropped, as are repeats of a number
//! already seen.

use std::collections::HashSet;

use bowlout_core::error::GameError;
use bowlout_core::participant::{Participant, ParticipantId};
use tracing::{debug, warn};

use super::roster::Roster;

/// Why a row was dropped during ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectedRow {
    /// The name field was empty.
    MissingName { line: usize },
    /// The number field was empty, not a positive integer, or zero.
    BadNumber { line: usize, value: String },
    /// The number repeats an earlier row.
    DuplicateNumber { line: usize, id: ParticipantId },
}

/// Parsed roster plus the rows that were dropped on the way.
#[derive(Debug, Clone)]
pub struct Ingested {
    /// The new roster.
    pub roster: Roster,
    /// Dropped rows, in source order.
    pub rejected: Vec<RejectedRow>,
}

/// Parses `source` into a roster.
///
/// # Errors
///
/// Returns `GameError::InvalidInput` if no valid rows remain.
pub fn parse_roster(source: &str) -> Result<Ingested, GameError> {
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .peekable();

    if lines
        .peek()
        .is_some_and(|(_, first)| first.to_lowercase().contains("name"))
    {
        lines.next();
    }

    let mut participants = Vec::new();
    let mut rejected = Vec::new();
    let mut seen = HashSet::new();

    for (line, text) in lines {
        let mut fields = text.split(',').map(str::trim);
        let name = fields.next().unwrap_or_default();
        let number = fields.next().unwrap_or_default();

        if name.is_empty() {
            rejected.push(RejectedRow::MissingName { line });
            continue;
        }
        let Some(id) = number.parse::<u32>().ok().and_then(ParticipantId::new) else {
            rejected.push(RejectedRow::BadNumber {
                line,
                value: number.to_owned(),
            });
            continue;
        };
        if !seen.insert(id) {
            rejected.push(RejectedRow::DuplicateNumber { line, id });
            continue;
        }

        participants.push(Participant::new(id, name));
    }

    for row in &rejected {
        warn!(?row, "dropped roster row");
    }

    if participants.is_empty() {
        return Err(GameError::InvalidInput(
            "no valid participants found".to_owned(),
        ));
    }

    debug!(
        accepted = participants.len(),
        rejected = rejected.len(),
        "parsed roster"
    );

    Ok(Ingested {
        roster: Roster::from_participants(participants)?,
        rejected,
    })
}
