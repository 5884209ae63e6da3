//! Rooms and their furniture inventories.

use chrono::Utc;

use domus_auth::Role;
use domus_core::{AggregateId, DomainResult};
use domus_housing::{
    AddFurniture, AdjustOccupancy, ChangeRoomStatus, FurnitureCondition, FurnitureItem,
    FurnitureKind, RecordInspection, RegisterRoom, RemoveFurniture, Room, RoomCommand, RoomEvent,
    RoomId, RoomStatus, UpdateFurnitureCondition,
};
use domus_notify::Severity;

use crate::context::AppContext;
use crate::guard;

const DENIAL: &str = "Only wardens can manage rooms.";

pub struct HousingService<'a> {
    pub(crate) ctx: &'a AppContext,
}

impl HousingService<'_> {
    pub fn register_room(
        &self,
        room_number: &str,
        floor: i32,
        capacity: u32,
    ) -> DomainResult<RoomId> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let room_id = RoomId::new(AggregateId::new());
        let events = self.execute(
            room_id,
            &RoomCommand::RegisterRoom(RegisterRoom {
                room_id,
                room_number: room_number.to_string(),
                floor,
                capacity,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Room Added",
            format!("Room {room_number} has been added successfully."),
        );
        Ok(room_id)
    }

    pub fn change_status(&self, room_id: RoomId, status: RoomStatus) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            room_id,
            &RoomCommand::ChangeRoomStatus(ChangeRoomStatus {
                room_id,
                status,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Room Updated",
            "The room status has been updated successfully.",
        );
        Ok(())
    }

    pub fn adjust_occupancy(&self, room_id: RoomId, delta: i32) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            room_id,
            &RoomCommand::AdjustOccupancy(AdjustOccupancy {
                room_id,
                delta,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Occupancy Updated",
            "The room occupancy has been updated.",
        );
        Ok(())
    }

    pub fn add_furniture(
        &self,
        room_id: RoomId,
        kind: FurnitureKind,
        condition: FurnitureCondition,
        quantity: u32,
        notes: Option<String>,
    ) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            room_id,
            &RoomCommand::AddFurniture(AddFurniture {
                room_id,
                kind,
                condition,
                quantity,
                notes,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Furniture Added",
            "The furniture item has been added to the room inventory.",
        );
        Ok(())
    }

    pub fn update_furniture_condition(
        &self,
        room_id: RoomId,
        kind: FurnitureKind,
        condition: FurnitureCondition,
    ) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            room_id,
            &RoomCommand::UpdateFurnitureCondition(UpdateFurnitureCondition {
                room_id,
                kind,
                condition,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Inventory Updated",
            "The furniture condition has been updated.",
        );
        Ok(())
    }

    pub fn remove_furniture(&self, room_id: RoomId, kind: FurnitureKind) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            room_id,
            &RoomCommand::RemoveFurniture(RemoveFurniture {
                room_id,
                kind,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Furniture Removed",
            "The furniture item has been removed from the room inventory.",
        );
        Ok(())
    }

    pub fn record_inspection(&self, room_id: RoomId) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            room_id,
            &RoomCommand::RecordInspection(RecordInspection {
                room_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Inspection Recorded",
            "The room inspection has been recorded.",
        );
        Ok(())
    }

    /// Unrestricted read of all rooms.
    pub fn rooms(&self) -> Vec<Room> {
        self.ctx.rooms.all()
    }

    pub fn room(&self, room_id: RoomId) -> Option<Room> {
        self.ctx.rooms.get(room_id)
    }

    /// Staff-gated view of a room's furniture inventory.
    pub fn furniture_inventory(&self, room_id: RoomId) -> DomainResult<Vec<FurnitureItem>> {
        guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            "Only wardens can view room inventories.",
        )?;

        Ok(self
            .ctx
            .rooms
            .get(room_id)
            .map(|room| room.furniture().to_vec())
            .unwrap_or_default())
    }

    fn execute(&self, room_id: RoomId, command: &RoomCommand) -> DomainResult<Vec<RoomEvent>> {
        self.ctx.rooms.execute(room_id, command).map_err(|err| {
            guard::notify_failure(&self.ctx.notifications, &err);
            err
        })
    }
}
