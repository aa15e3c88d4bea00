//! Dismissal narrator and its finale pool.

use bowlout_core::rng::{DeterministicRng, pick_index};
use serde::Serialize;
use tracing::trace;

use super::messages::{
    FINALE_DISMISSALS, FINALE_DISPLAY_MS, FINALE_THRESHOLD, REGULAR_DISMISSALS,
    REGULAR_DISPLAY_MS,
};

/// A narrated elimination message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dismissal {
    /// Text shown with the elimination.
    pub message: &'static str,
    /// How long the message stays visible.
    pub display_ms: u64,
    /// Whether it came from the finale set.
    pub finale: bool,
}

/// Consumable finale messages, refilled to the full set once exhausted.
#[derive(Debug, Clone)]
pub struct DismissalPool {
    full: &'static [&'static str],
    remaining: Vec<&'static str>,
}

impl DismissalPool {
    /// Creates a full pool over `messages`.
    #[must_use]
    pub fn new(messages: &'static [&'static str]) -> Self {
        Self {
            full: messages,
            remaining: messages.to_vec(),
        }
    }

    /// Refills the pool to the full set.
    pub fn reset(&mut self) {
        self.remaining = self.full.to_vec();
    }

    /// Messages left before the next refill.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Draws one message without replacement, refilling first if empty.
    ///
    /// Returns `None` only for a pool built over an empty set.
    pub fn draw(&mut self, rng: &mut dyn DeterministicRng) -> Option<&'static str> {
        if self.remaining.is_empty() {
            trace!("dismissal pool exhausted, refilling");
            self.reset();
        }
        let index = pick_index(rng, self.remaining.len())?;
        Some(self.remaining.remove(index))
    }
}

/// Chooses the dismissal message for each elimination.
#[derive(Debug, Clone)]
pub struct DismissalNarrator {
    finale_pool: DismissalPool,
}

impl DismissalNarrator {
    /// Creates a narrator with a full finale pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            finale_pool: DismissalPool::new(&FINALE_DISMISSALS),
        }
    }

    /// Refills the finale pool.
    pub fn reset(&mut self) {
        self.finale_pool.reset();
    }

    /// Returns the finale pool.
    #[must_use]
    pub fn finale_pool(&self) -> &DismissalPool {
        &self.finale_pool
    }

    /// Narrates an elimination that leaves `remaining_after` participants
    /// alive.
    pub fn next(&mut self, remaining_after: usize, rng: &mut dyn DeterministicRng) -> Dismissal {
        if remaining_after < FINALE_THRESHOLD {
            if let Some(message) = self.finale_pool.draw(rng) {
                return Dismissal {
                    message,
                    display_ms: FINALE_DISPLAY_MS,
                    finale: true,
                };
            }
        }

        let index = pick_index(rng, REGULAR_DISMISSALS.len()).unwrap_or_default();
        Dismissal {
            message: REGULAR_DISMISSALS[index],
            display_ms: REGULAR_DISPLAY_MS,
            finale: false,
        }
    }
}

impl Default for DismissalNarrator {
    fn default() -> Self {
        Self::new()
    }
}
