//! In-memory aggregate registry (command execution pipeline).
//!
//! Execution flow per command:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load current aggregate state (or an empty instance for new ids)
//!   ↓
//! 2. Handle command (pure decision logic, produces events)
//!   ↓
//! 3. Apply events to evolve state
//!   ↓
//! 4. Store the new state
//! ```
//!
//! Handling happens strictly before any mutation, so a rejected command
//! leaves the registry untouched (all-or-nothing).

use std::collections::HashMap;
use std::sync::Mutex;

use domus_core::{Aggregate, DomainError, DomainResult};
use domus_events::DomainEvent;

/// In-memory store of aggregates of one kind, keyed by id.
///
/// `make_empty` constructs the pre-creation state a first command (e.g. a
/// registration) is handled against.
pub struct Registry<A: Aggregate> {
    make_empty: fn(A::Id) -> A,
    items: Mutex<HashMap<A::Id, A>>,
}

impl<A> Registry<A>
where
    A: Aggregate<Error = DomainError> + Clone,
    A::Id: Copy,
    A::Event: DomainEvent,
{
    pub fn new(make_empty: fn(A::Id) -> A) -> Self {
        Self {
            make_empty,
            items: Mutex::new(HashMap::new()),
        }
    }

    /// Execute a command against the aggregate with the given id.
    ///
    /// Returns the emitted events. On error nothing is stored.
    pub fn execute(&self, id: A::Id, command: &A::Command) -> DomainResult<Vec<A::Event>> {
        let mut items = self.items.lock().unwrap();

        let mut aggregate = items
            .get(&id)
            .cloned()
            .unwrap_or_else(|| (self.make_empty)(id));

        let events = aggregate.handle(command)?;
        for event in &events {
            tracing::debug!(event_type = event.event_type(), "applying event");
            aggregate.apply(event);
        }
        items.insert(id, aggregate);

        Ok(events)
    }

    /// Snapshot of one aggregate's current state.
    pub fn get(&self, id: A::Id) -> Option<A> {
        self.items.lock().unwrap().get(&id).cloned()
    }

    /// Snapshot of all aggregates, in no particular order.
    pub fn all(&self) -> Vec<A> {
        self.items.lock().unwrap().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domus_core::{AggregateId, AggregateRoot};
    use domus_housing::{AdjustOccupancy, RegisterRoom, Room, RoomCommand, RoomId};

    fn register_cmd(room_id: RoomId, capacity: u32) -> RoomCommand {
        RoomCommand::RegisterRoom(RegisterRoom {
            room_id,
            room_number: "A-1".to_string(),
            floor: 1,
            capacity,
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn execute_stores_the_evolved_aggregate() {
        let registry: Registry<Room> = Registry::new(Room::empty);
        let room_id = RoomId::new(AggregateId::new());

        let events = registry.execute(room_id, &register_cmd(room_id, 2)).unwrap();
        assert_eq!(events.len(), 1);

        let room = registry.get(room_id).expect("stored");
        assert_eq!(room.capacity(), 2);
        assert_eq!(room.version(), 1);
    }

    #[test]
    fn rejected_commands_leave_the_registry_untouched() {
        let registry: Registry<Room> = Registry::new(Room::empty);
        let room_id = RoomId::new(AggregateId::new());
        registry.execute(room_id, &register_cmd(room_id, 1)).unwrap();

        // Over-capacity adjustment is rejected by the aggregate.
        let err = registry
            .execute(
                room_id,
                &RoomCommand::AdjustOccupancy(AdjustOccupancy {
                    room_id,
                    delta: 2,
                    occurred_at: Utc::now(),
                }),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let room = registry.get(room_id).expect("still stored");
        assert_eq!(room.occupancy(), 0);
        assert_eq!(room.version(), 1);
    }

    #[test]
    fn failed_creation_does_not_materialize_an_aggregate() {
        let registry: Registry<Room> = Registry::new(Room::empty);
        let room_id = RoomId::new(AggregateId::new());

        let err = registry.execute(room_id, &register_cmd(room_id, 0)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(registry.get(room_id).is_none());
        assert!(registry.is_empty());
    }
}
