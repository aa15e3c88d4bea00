//! Command trait.

use uuid::Uuid;

/// A request to change game state, carried into a handler.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted name recorded on the handler span, e.g. `game.advance_round`.
    fn command_type(&self) -> &'static str;

    /// Identifier shared by the command and every event it produces.
    fn correlation_id(&self) -> Uuid;
}
