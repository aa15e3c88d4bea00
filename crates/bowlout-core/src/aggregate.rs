//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots whose state changes are recorded as events.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of events applied).
    fn version(&self) -> i64;

    /// Apply an event to mutate internal state.
    fn apply(&mut self, event: &Self::Event);

    /// Returns events recorded since the last drain.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events once they have been dispatched.
    fn clear_uncommitted_events(&mut self);

    /// Drains the events recorded since the last drain, oldest first.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>
    where
        Self::Event: Clone,
    {
        let events = self.uncommitted_events().to_vec();
        self.clear_uncommitted_events();
        events
    }
}
