//! Pacing policy: how many to remove per round, and how fast.

use serde::{Deserialize, Serialize};

/// Alive count at which the game enters its final stage.
pub const FINAL_STAGE_SIZE: usize = 10;

/// Batch size and inter-elimination delay for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pace {
    /// Eliminations the round aims for, before clamping.
    pub batch_size: usize,
    /// Gap between two eliminations, in milliseconds.
    pub delay_ms: u64,
}

impl Pace {
    /// The fixed final-stage pace: one elimination, slow.
    pub const FINAL: Self = Self {
        batch_size: 1,
        delay_ms: 1_200,
    };
}

/// Maps the number of participants remaining to the round's pace.
///
/// | remaining | batch | delay |
/// |---|---|---|
/// | <= 10 | 1 | 1200 |
/// | 11-20 | remaining - 10 | 1000 |
/// | 21-30 | min(10, remaining - 15) | 600 |
/// | 31-50 | 15 | 600 |
/// | 51-100 | 25 | 500 |
/// | > 100 | 40 | 400 |
///
/// The 11-20 band lands exactly on ten so the auction checkpoint is never
/// overshot.
#[must_use]
pub fn pace(remaining: usize) -> Pace {
    match remaining {
        0..=FINAL_STAGE_SIZE => Pace::FINAL,
        11..=20 => Pace {
            batch_size: remaining - FINAL_STAGE_SIZE,
            delay_ms: 1_000,
        },
        21..=30 => Pace {
            batch_size: 10.min(remaining - 15),
            delay_ms: 600,
        },
        31..=50 => Pace {
            batch_size: 15,
            delay_ms: 600,
        },
        51..=100 => Pace {
            batch_size: 25,
            delay_ms: 500,
        },
        _ => Pace {
            batch_size: 40,
            delay_ms: 400,
        },
    }
}

/// Clamps a policy batch to what the field can actually give up.
///
/// Never more than `remaining`, and never the last non-protected
/// participant when someone is protected.
#[must_use]
pub fn clamp_batch(batch_size: usize, remaining: usize, protected: bool) -> usize {
    let limit = if protected {
        remaining.saturating_sub(1)
    } else {
        remaining
    };
    batch_size.min(limit)
}
