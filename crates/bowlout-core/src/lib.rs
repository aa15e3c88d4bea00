//! Bowlout Core — shared domain abstractions.
//!
//! This crate defines the vocabulary and seams that every other bowlout
//! crate depends on: participants, stages, the error taxonomy, the event
//! envelope, and the randomness/time abstractions that keep a game
//! reproducible under test. It contains no presentation code.

pub mod aggregate;
pub mod command;
pub mod error;
pub mod event;
pub mod participant;
pub mod rng;
pub mod sink;
pub mod stage;
pub mod time;
