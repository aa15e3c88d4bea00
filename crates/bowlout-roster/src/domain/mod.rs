//! Domain layer for the roster context.

pub mod ingest;
pub mod roster;
