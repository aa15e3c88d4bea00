//! Scripted randomness for tests.

use bowlout_core::rng::DeterministicRng;

/// Always answers `min` (and `0.0`). Draws therefore always take the first
/// candidates in roster order, which makes whole games predictable.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        (0..amount.min(len)).collect()
    }
}

/// An RNG that returns values from a predetermined sequence. Each value is
/// added to the requested `min` and clamped to `max`, so a script can be
/// read as "offsets into the remaining candidates". Panics if the sequence
/// is exhausted.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Plays back `values` in order.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of values consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        min.saturating_add(val).min(max)
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }

    /// Each scripted value is an offset into the indices not yet drawn.
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..len).collect();
        (0..amount.min(len))
            .map(|_| {
                let offset = self.next_u32_range(0, u32::MAX) as usize;
                pool.remove(offset.min(pool.len() - 1))
            })
            .collect()
    }
}
