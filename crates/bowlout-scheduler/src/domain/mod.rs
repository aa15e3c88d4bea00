//! Domain layer for the scheduler context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod pacing;
pub mod round;
