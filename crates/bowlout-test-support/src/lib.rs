//! Shared test doubles for the Bowlout elimination game.

mod clock;
mod rng;
mod sink;
mod ticker;

pub use clock::{FixedClock, fixed_clock};
pub use rng::{MockRng, SequenceRng};
pub use sink::{RecordingSink, SinkCall};
pub use ticker::InstantTicker;
