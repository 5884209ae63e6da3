//! Housing domain module (rooms and their inventories, event-sourced).
//!
//! This crate contains business rules for rooms, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod room;

pub use room::{
    AddFurniture, AdjustOccupancy, ChangeRoomStatus, FurnitureAdded, FurnitureCondition,
    FurnitureConditionUpdated, FurnitureItem, FurnitureKind, FurnitureRemoved, InspectionRecorded,
    OccupancyAdjusted, RecordInspection, RegisterRoom, RemoveFurniture, Room, RoomCommand,
    RoomEvent, RoomId, RoomRegistered, RoomStatus, RoomStatusChanged, UpdateFurnitureCondition,
};
