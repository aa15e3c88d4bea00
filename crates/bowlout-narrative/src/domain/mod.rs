//! Domain layer for the narrative context.

pub mod messages;
pub mod narrator;
