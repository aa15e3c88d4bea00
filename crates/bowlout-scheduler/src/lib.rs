//! Bowlout — Pacing policy and elimination scheduler.
//!
//! Responsible for deciding, round by round, how many participants to
//! remove, which ones, and how fast; for protecting the distinguished
//! participant during bulk play; and for walking the game through the
//! auction checkpoint to a single winner.

pub mod application;
pub mod domain;
