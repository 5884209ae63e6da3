use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domus_core::{Aggregate, AggregateId, AggregateRoot, DomainError};
use domus_events::DomainEvent;

/// Room identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub AggregateId);

impl RoomId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for RoomId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Room availability lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
    Reserved,
}

/// Kind of a furniture line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureKind {
    Bed,
    Mattress,
    Desk,
    Chair,
    Wardrobe,
    ClothesRack,
    Cupboard,
    Other,
}

/// Condition grading for furniture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FurnitureCondition {
    Excellent,
    Good,
    Fair,
    Poor,
    Broken,
}

/// One furniture line item in a room's inventory.
///
/// A room carries at most one line per kind; quantity covers multiples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub kind: FurnitureKind,
    pub condition: FurnitureCondition,
    pub quantity: u32,
    pub notes: Option<String>,
}

/// Aggregate root: Room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    room_number: String,
    floor: i32,
    capacity: u32,
    occupancy: u32,
    status: RoomStatus,
    furniture: Vec<FurnitureItem>,
    last_inspection: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Room {
    /// Create an empty, not-yet-registered aggregate instance for rehydration.
    pub fn empty(id: RoomId) -> Self {
        Self {
            id,
            room_number: String::new(),
            floor: 0,
            capacity: 0,
            occupancy: 0,
            status: RoomStatus::Available,
            furniture: Vec::new(),
            last_inspection: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> RoomId {
        self.id
    }

    pub fn room_number(&self) -> &str {
        &self.room_number
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn furniture(&self) -> &[FurnitureItem] {
        &self.furniture
    }

    pub fn last_inspection(&self) -> Option<DateTime<Utc>> {
        self.last_inspection
    }

    /// Invariant helper: whether another occupant fits.
    pub fn has_capacity(&self) -> bool {
        self.occupancy < self.capacity
    }
}

impl AggregateRoot for Room {
    type Id = RoomId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: RegisterRoom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRoom {
    pub room_id: RoomId,
    pub room_number: String,
    pub floor: i32,
    pub capacity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ChangeRoomStatus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRoomStatus {
    pub room_id: RoomId,
    pub status: RoomStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustOccupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustOccupancy {
    pub room_id: RoomId,
    pub delta: i32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddFurniture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddFurniture {
    pub room_id: RoomId,
    pub kind: FurnitureKind,
    pub condition: FurnitureCondition,
    pub quantity: u32,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateFurnitureCondition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFurnitureCondition {
    pub room_id: RoomId,
    pub kind: FurnitureKind,
    pub condition: FurnitureCondition,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveFurniture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveFurniture {
    pub room_id: RoomId,
    pub kind: FurnitureKind,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordInspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInspection {
    pub room_id: RoomId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomCommand {
    RegisterRoom(RegisterRoom),
    ChangeRoomStatus(ChangeRoomStatus),
    AdjustOccupancy(AdjustOccupancy),
    AddFurniture(AddFurniture),
    UpdateFurnitureCondition(UpdateFurnitureCondition),
    RemoveFurniture(RemoveFurniture),
    RecordInspection(RecordInspection),
}

/// Event: RoomRegistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRegistered {
    pub room_id: RoomId,
    pub room_number: String,
    pub floor: i32,
    pub capacity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RoomStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStatusChanged {
    pub room_id: RoomId,
    pub status: RoomStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OccupancyAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyAdjusted {
    pub room_id: RoomId,
    pub delta: i32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FurnitureAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureAdded {
    pub room_id: RoomId,
    pub kind: FurnitureKind,
    pub condition: FurnitureCondition,
    pub quantity: u32,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FurnitureConditionUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureConditionUpdated {
    pub room_id: RoomId,
    pub kind: FurnitureKind,
    pub condition: FurnitureCondition,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FurnitureRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureRemoved {
    pub room_id: RoomId,
    pub kind: FurnitureKind,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InspectionRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRecorded {
    pub room_id: RoomId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomEvent {
    RoomRegistered(RoomRegistered),
    RoomStatusChanged(RoomStatusChanged),
    OccupancyAdjusted(OccupancyAdjusted),
    FurnitureAdded(FurnitureAdded),
    FurnitureConditionUpdated(FurnitureConditionUpdated),
    FurnitureRemoved(FurnitureRemoved),
    InspectionRecorded(InspectionRecorded),
}

impl DomainEvent for RoomEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RoomEvent::RoomRegistered(_) => "housing.room.registered",
            RoomEvent::RoomStatusChanged(_) => "housing.room.status_changed",
            RoomEvent::OccupancyAdjusted(_) => "housing.room.occupancy_adjusted",
            RoomEvent::FurnitureAdded(_) => "housing.room.furniture_added",
            RoomEvent::FurnitureConditionUpdated(_) => "housing.room.furniture_condition_updated",
            RoomEvent::FurnitureRemoved(_) => "housing.room.furniture_removed",
            RoomEvent::InspectionRecorded(_) => "housing.room.inspection_recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RoomEvent::RoomRegistered(e) => e.occurred_at,
            RoomEvent::RoomStatusChanged(e) => e.occurred_at,
            RoomEvent::OccupancyAdjusted(e) => e.occurred_at,
            RoomEvent::FurnitureAdded(e) => e.occurred_at,
            RoomEvent::FurnitureConditionUpdated(e) => e.occurred_at,
            RoomEvent::FurnitureRemoved(e) => e.occurred_at,
            RoomEvent::InspectionRecorded(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Room {
    type Command = RoomCommand;
    type Event = RoomEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            RoomEvent::RoomRegistered(e) => {
                self.id = e.room_id;
                self.room_number = e.room_number.clone();
                self.floor = e.floor;
                self.capacity = e.capacity;
                self.occupancy = 0;
                self.status = RoomStatus::Available;
                self.created = true;
            }
            RoomEvent::RoomStatusChanged(e) => {
                self.status = e.status;
            }
            RoomEvent::OccupancyAdjusted(e) => {
                self.occupancy = self.occupancy.saturating_add_signed(e.delta);
            }
            RoomEvent::FurnitureAdded(e) => {
                self.furniture.push(FurnitureItem {
                    kind: e.kind,
                    condition: e.condition,
                    quantity: e.quantity,
                    notes: e.notes.clone(),
                });
            }
            RoomEvent::FurnitureConditionUpdated(e) => {
                if let Some(item) = self.furniture.iter_mut().find(|f| f.kind == e.kind) {
                    item.condition = e.condition;
                }
            }
            RoomEvent::FurnitureRemoved(e) => {
                self.furniture.retain(|f| f.kind != e.kind);
            }
            RoomEvent::InspectionRecorded(e) => {
                self.last_inspection = Some(e.occurred_at);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            RoomCommand::RegisterRoom(cmd) => self.handle_register(cmd),
            RoomCommand::ChangeRoomStatus(cmd) => self.handle_change_status(cmd),
            RoomCommand::AdjustOccupancy(cmd) => self.handle_adjust_occupancy(cmd),
            RoomCommand::AddFurniture(cmd) => self.handle_add_furniture(cmd),
            RoomCommand::UpdateFurnitureCondition(cmd) => self.handle_update_condition(cmd),
            RoomCommand::RemoveFurniture(cmd) => self.handle_remove_furniture(cmd),
            RoomCommand::RecordInspection(cmd) => self.handle_record_inspection(cmd),
        }
    }
}

impl Room {
    fn ensure_room_id(&self, room_id: RoomId) -> Result<(), DomainError> {
        if self.id != room_id {
            return Err(DomainError::invariant("room_id mismatch"));
        }
        Ok(())
    }

    fn ensure_registered(&self, room_id: RoomId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_room_id(room_id)
    }

    fn handle_register(&self, cmd: &RegisterRoom) -> Result<Vec<RoomEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("room already registered"));
        }
        if cmd.room_number.trim().is_empty() {
            return Err(DomainError::validation("room number cannot be empty"));
        }
        if cmd.capacity == 0 {
            return Err(DomainError::validation("capacity must be at least 1"));
        }

        Ok(vec![RoomEvent::RoomRegistered(RoomRegistered {
            room_id: cmd.room_id,
            room_number: cmd.room_number.clone(),
            floor: cmd.floor,
            capacity: cmd.capacity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_change_status(&self, cmd: &ChangeRoomStatus) -> Result<Vec<RoomEvent>, DomainError> {
        self.ensure_registered(cmd.room_id)?;

        if self.status == cmd.status {
            return Err(DomainError::conflict("room is already in that status"));
        }

        Ok(vec![RoomEvent::RoomStatusChanged(RoomStatusChanged {
            room_id: cmd.room_id,
            status: cmd.status,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust_occupancy(&self, cmd: &AdjustOccupancy) -> Result<Vec<RoomEvent>, DomainError> {
        self.ensure_registered(cmd.room_id)?;

        if cmd.delta == 0 {
            return Err(DomainError::validation("delta cannot be zero"));
        }

        let new_occupancy = i64::from(self.occupancy) + i64::from(cmd.delta);
        if new_occupancy < 0 {
            return Err(DomainError::invariant("occupancy cannot go negative"));
        }
        if new_occupancy > i64::from(self.capacity) {
            return Err(DomainError::invariant("occupancy cannot exceed capacity"));
        }

        Ok(vec![RoomEvent::OccupancyAdjusted(OccupancyAdjusted {
            room_id: cmd.room_id,
            delta: cmd.delta,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_furniture(&self, cmd: &AddFurniture) -> Result<Vec<RoomEvent>, DomainError> {
        self.ensure_registered(cmd.room_id)?;

        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if self.furniture.iter().any(|f| f.kind == cmd.kind) {
            return Err(DomainError::conflict(
                "furniture of that kind is already listed for this room",
            ));
        }

        Ok(vec![RoomEvent::FurnitureAdded(FurnitureAdded {
            room_id: cmd.room_id,
            kind: cmd.kind,
            condition: cmd.condition,
            quantity: cmd.quantity,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_condition(
        &self,
        cmd: &UpdateFurnitureCondition,
    ) -> Result<Vec<RoomEvent>, DomainError> {
        self.ensure_registered(cmd.room_id)?;

        if !self.furniture.iter().any(|f| f.kind == cmd.kind) {
            return Err(DomainError::invariant(
                "no furniture of that kind listed for this room",
            ));
        }

        Ok(vec![RoomEvent::FurnitureConditionUpdated(
            FurnitureConditionUpdated {
                room_id: cmd.room_id,
                kind: cmd.kind,
                condition: cmd.condition,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_remove_furniture(&self, cmd: &RemoveFurniture) -> Result<Vec<RoomEvent>, DomainError> {
        self.ensure_registered(cmd.room_id)?;

        if !self.furniture.iter().any(|f| f.kind == cmd.kind) {
            return Err(DomainError::invariant(
                "no furniture of that kind listed for this room",
            ));
        }

        Ok(vec![RoomEvent::FurnitureRemoved(FurnitureRemoved {
            room_id: cmd.room_id,
            kind: cmd.kind,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_inspection(&self, cmd: &RecordInspection) -> Result<Vec<RoomEvent>, DomainError> {
        self.ensure_registered(cmd.room_id)?;

        Ok(vec![RoomEvent::InspectionRecorded(InspectionRecorded {
            room_id: cmd.room_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
