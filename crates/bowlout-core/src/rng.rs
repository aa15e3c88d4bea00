//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests and replays,
//! a seeded or scripted implementation is injected.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Generate a random `f64` in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Draw `amount` distinct indices from `0..len`, in draw order.
    ///
    /// `amount` is clamped to `len`.
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;
}

/// Production RNG backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SystemRng {
    inner: StdRng,
}

impl SystemRng {
    /// Creates an RNG seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Creates an RNG that replays the same sequence for the same seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.inner.random_range(min..=max)
    }

    fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.inner, len, amount.min(len)).into_vec()
    }
}

/// Picks a uniformly random index into a collection of `len` items.
///
/// Returns `None` for an empty collection.
pub fn pick_index(rng: &mut dyn DeterministicRng, len: usize) -> Option<usize> {
    let last = u32::try_from(len.checked_sub(1)?).unwrap_or(u32::MAX);
    Some(rng.next_u32_range(0, last) as usize)
}

/// Draws `count` items uniformly at random without replacement, in draw
/// order. `count` is clamped to `items.len()`.
pub fn sample_without_replacement<T: Clone>(
    rng: &mut dyn DeterministicRng,
    items: &[T],
    count: usize,
) -> Vec<T> {
    rng.sample_indices(items.len(), count)
        .into_iter()
        .filter_map(|i| items.get(i).cloned())
        .collect()
}
