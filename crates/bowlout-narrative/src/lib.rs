//! Bowlout — Dismissal narration.
//!
//! Picks the flavor message shown with each elimination: regular messages
//! with replacement during bulk play, and a non-repeating finale cycle once
//! fewer than ten participants remain.

pub mod domain;
