use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domus_core::{Aggregate, AggregateId, AggregateRoot, DomainError, UserId};
use domus_events::DomainEvent;
use domus_housing::RoomId;

/// Assignment identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(pub AggregateId);

impl AssignmentId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Who currently holds the room key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    WithStudent,
    WithWarden,
    Lost,
}

/// Direction of a key handover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoverDirection {
    StudentToWarden,
    WardenToStudent,
}

impl HandoverDirection {
    /// Custody required before this handover may be recorded.
    fn required_custody(self) -> KeyStatus {
        match self {
            HandoverDirection::StudentToWarden => KeyStatus::WithStudent,
            HandoverDirection::WardenToStudent => KeyStatus::WithWarden,
        }
    }

    /// Custody after this handover is confirmed.
    fn resulting_custody(self) -> KeyStatus {
        match self {
            HandoverDirection::StudentToWarden => KeyStatus::WithWarden,
            HandoverDirection::WardenToStudent => KeyStatus::WithStudent,
        }
    }
}

/// A recorded handover awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingHandover {
    pub direction: HandoverDirection,
    pub warden_id: UserId,
    pub notes: Option<String>,
}

/// Aggregate root: Assignment (a student's binding to a room, plus key custody).
///
/// # Invariants
/// - The key starts with the warden; custody changes only through confirmed
///   handovers, loss reports and replacements.
/// - A handover direction must match current custody, and only one handover
///   may be pending at a time.
/// - A lost key blocks handovers until it is replaced (custody returns to the
///   warden).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    id: AssignmentId,
    student_id: UserId,
    room_id: RoomId,
    academic_year: String,
    key_status: KeyStatus,
    pending: Option<PendingHandover>,
    last_handover: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Assignment {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: AssignmentId) -> Self {
        Self {
            id,
            student_id: UserId::from_uuid(uuid::Uuid::nil()),
            room_id: RoomId::new(AggregateId::from_uuid(uuid::Uuid::nil())),
            academic_year: String::new(),
            key_status: KeyStatus::WithWarden,
            pending: None,
            last_handover: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> AssignmentId {
        self.id
    }

    pub fn student_id(&self) -> UserId {
        self.student_id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn academic_year(&self) -> &str {
        &self.academic_year
    }

    pub fn key_status(&self) -> KeyStatus {
        self.key_status
    }

    pub fn pending_handover(&self) -> Option<&PendingHandover> {
        self.pending.as_ref()
    }

    pub fn last_handover(&self) -> Option<DateTime<Utc>> {
        self.last_handover
    }
}

impl AggregateRoot for Assignment {
    type Id = AssignmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AssignRoom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRoom {
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub room_id: RoomId,
    pub academic_year: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordHandover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHandover {
    pub assignment_id: AssignmentId,
    pub direction: HandoverDirection,
    pub warden_id: UserId,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConfirmHandover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmHandover {
    pub assignment_id: AssignmentId,
    pub warden_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReportKeyLost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportKeyLost {
    pub assignment_id: AssignmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReplaceKey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceKey {
    pub assignment_id: AssignmentId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentCommand {
    AssignRoom(AssignRoom),
    RecordHandover(RecordHandover),
    ConfirmHandover(ConfirmHandover),
    ReportKeyLost(ReportKeyLost),
    ReplaceKey(ReplaceKey),
}

/// Event: RoomAssigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAssigned {
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub room_id: RoomId,
    pub academic_year: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: HandoverRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoverRecorded {
    pub assignment_id: AssignmentId,
    pub direction: HandoverDirection,
    pub warden_id: UserId,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: HandoverConfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoverConfirmed {
    pub assignment_id: AssignmentId,
    pub direction: HandoverDirection,
    pub warden_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: KeyLostReported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyLostReported {
    pub assignment_id: AssignmentId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: KeyReplaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyReplaced {
    pub assignment_id: AssignmentId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentEvent {
    RoomAssigned(RoomAssigned),
    HandoverRecorded(HandoverRecorded),
    HandoverConfirmed(HandoverConfirmed),
    KeyLostReported(KeyLostReported),
    KeyReplaced(KeyReplaced),
}

impl DomainEvent for AssignmentEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AssignmentEvent::RoomAssigned(_) => "residency.assignment.room_assigned",
            AssignmentEvent::HandoverRecorded(_) => "residency.assignment.handover_recorded",
            AssignmentEvent::HandoverConfirmed(_) => "residency.assignment.handover_confirmed",
            AssignmentEvent::KeyLostReported(_) => "residency.assignment.key_lost_reported",
            AssignmentEvent::KeyReplaced(_) => "residency.assignment.key_replaced",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AssignmentEvent::RoomAssigned(e) => e.occurred_at,
            AssignmentEvent::HandoverRecorded(e) => e.occurred_at,
            AssignmentEvent::HandoverConfirmed(e) => e.occurred_at,
            AssignmentEvent::KeyLostReported(e) => e.occurred_at,
            AssignmentEvent::KeyReplaced(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Assignment {
    type Command = AssignmentCommand;
    type Event = AssignmentEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AssignmentEvent::RoomAssigned(e) => {
                self.id = e.assignment_id;
                self.student_id = e.student_id;
                self.room_id = e.room_id;
                self.academic_year = e.academic_year.clone();
                self.key_status = KeyStatus::WithWarden;
                self.created = true;
            }
            AssignmentEvent::HandoverRecorded(e) => {
                self.pending = Some(PendingHandover {
                    direction: e.direction,
                    warden_id: e.warden_id,
                    notes: e.notes.clone(),
                });
            }
            AssignmentEvent::HandoverConfirmed(e) => {
                self.key_status = e.direction.resulting_custody();
                self.pending = None;
                self.last_handover = Some(e.occurred_at);
            }
            AssignmentEvent::KeyLostReported(_) => {
                self.key_status = KeyStatus::Lost;
                self.pending = None;
            }
            AssignmentEvent::KeyReplaced(_) => {
                self.key_status = KeyStatus::WithWarden;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            AssignmentCommand::AssignRoom(cmd) => self.handle_assign(cmd),
            AssignmentCommand::RecordHandover(cmd) => self.handle_record_handover(cmd),
            AssignmentCommand::ConfirmHandover(cmd) => self.handle_confirm_handover(cmd),
            AssignmentCommand::ReportKeyLost(cmd) => self.handle_report_lost(cmd),
            AssignmentCommand::ReplaceKey(cmd) => self.handle_replace_key(cmd),
        }
    }
}

impl Assignment {
    fn ensure_assigned(&self, assignment_id: AssignmentId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.id != assignment_id {
            return Err(DomainError::invariant("assignment_id mismatch"));
        }
        Ok(())
    }

    fn handle_assign(&self, cmd: &AssignRoom) -> Result<Vec<AssignmentEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("assignment already exists"));
        }
        if cmd.academic_year.trim().is_empty() {
            return Err(DomainError::validation("academic year cannot be empty"));
        }

        Ok(vec![AssignmentEvent::RoomAssigned(RoomAssigned {
            assignment_id: cmd.assignment_id,
            student_id: cmd.student_id,
            room_id: cmd.room_id,
            academic_year: cmd.academic_year.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_record_handover(
        &self,
        cmd: &RecordHandover,
    ) -> Result<Vec<AssignmentEvent>, DomainError> {
        self.ensure_assigned(cmd.assignment_id)?;

        if self.key_status == KeyStatus::Lost {
            return Err(DomainError::invariant(
                "key is reported lost; replace it before recording handovers",
            ));
        }
        if self.pending.is_some() {
            return Err(DomainError::conflict("a handover is already pending"));
        }
        if self.key_status != cmd.direction.required_custody() {
            return Err(DomainError::invariant(
                "handover direction does not match current key custody",
            ));
        }

        Ok(vec![AssignmentEvent::HandoverRecorded(HandoverRecorded {
            assignment_id: cmd.assignment_id,
            direction: cmd.direction,
            warden_id: cmd.warden_id,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_confirm_handover(
        &self,
        cmd: &ConfirmHandover,
    ) -> Result<Vec<AssignmentEvent>, DomainError> {
        self.ensure_assigned(cmd.assignment_id)?;

        let pending = self
            .pending
            .as_ref()
            .ok_or_else(|| DomainError::conflict("no handover pending confirmation"))?;

        Ok(vec![AssignmentEvent::HandoverConfirmed(HandoverConfirmed {
            assignment_id: cmd.assignment_id,
            direction: pending.direction,
            warden_id: cmd.warden_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_report_lost(&self, cmd: &ReportKeyLost) -> Result<Vec<AssignmentEvent>, DomainError> {
        self.ensure_assigned(cmd.assignment_id)?;

        if self.key_status == KeyStatus::Lost {
            return Err(DomainError::conflict("key is already reported lost"));
        }

        Ok(vec![AssignmentEvent::KeyLostReported(KeyLostReported {
            assignment_id: cmd.assignment_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_replace_key(&self, cmd: &ReplaceKey) -> Result<Vec<AssignmentEvent>, DomainError> {
        self.ensure_assigned(cmd.assignment_id)?;

        if self.key_status != KeyStatus::Lost {
            return Err(DomainError::invariant("only a lost key can be replaced"));
        }

        Ok(vec![AssignmentEvent::KeyReplaced(KeyReplaced {
            assignment_id: cmd.assignment_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_assignment_id() -> AssignmentId {
        AssignmentId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn assigned() -> (Assignment, AssignmentId, UserId) {
        let assignment_id = test_assignment_id();
        let student_id = UserId::new();
        let mut assignment = Assignment::empty(assignment_id);
        let events = assignment
            .handle(&AssignmentCommand::AssignRoom(AssignRoom {
                assignment_id,
                student_id,
                room_id: RoomId::new(AggregateId::new()),
                academic_year: "2026/2027".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap();
        assignment.apply(&events[0]);
        (assignment, assignment_id, student_id)
    }

    fn record_and_confirm(
        assignment: &mut Assignment,
        assignment_id: AssignmentId,
        direction: HandoverDirection,
    ) {
        let warden_id = UserId::new();
        let events = assignment
            .handle(&AssignmentCommand::RecordHandover(RecordHandover {
                assignment_id,
                direction,
                warden_id,
                notes: None,
                occurred_at: test_time(),
            }))
            .unwrap();
        assignment.apply(&events[0]);
        let events = assignment
            .handle(&AssignmentCommand::ConfirmHandover(ConfirmHandover {
                assignment_id,
                warden_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        assignment.apply(&events[0]);
    }

    #[test]
    fn assign_room_starts_with_the_key_at_the_warden() {
        let (assignment, _, student_id) = assigned();
        assert_eq!(assignment.key_status(), KeyStatus::WithWarden);
        assert_eq!(assignment.student_id(), student_id);
        assert_eq!(assignment.academic_year(), "2026/2027");
    }

    #[test]
    fn assign_room_rejects_empty_academic_year() {
        let assignment_id = test_assignment_id();
        let assignment = Assignment::empty(assignment_id);
        let err = assignment
            .handle(&AssignmentCommand::AssignRoom(AssignRoom {
                assignment_id,
                student_id: UserId::new(),
                room_id: RoomId::new(AggregateId::new()),
                academic_year: "  ".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn confirmed_handover_flips_custody_each_way() {
        let (mut assignment, assignment_id, _) = assigned();

        record_and_confirm(
            &mut assignment,
            assignment_id,
            HandoverDirection::WardenToStudent,
        );
        assert_eq!(assignment.key_status(), KeyStatus::WithStudent);
        assert!(assignment.last_handover().is_some());

        record_and_confirm(
            &mut assignment,
            assignment_id,
            HandoverDirection::StudentToWarden,
        );
        assert_eq!(assignment.key_status(), KeyStatus::WithWarden);
    }

    #[test]
    fn handover_direction_must_match_custody() {
        let (assignment, assignment_id, _) = assigned();

        // Key is with the warden; student cannot hand it over.
        let err = assignment
            .handle(&AssignmentCommand::RecordHandover(RecordHandover {
                assignment_id,
                direction: HandoverDirection::StudentToWarden,
                warden_id: UserId::new(),
                notes: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn only_one_handover_may_be_pending() {
        let (mut assignment, assignment_id, _) = assigned();

        let events = assignment
            .handle(&AssignmentCommand::RecordHandover(RecordHandover {
                assignment_id,
                direction: HandoverDirection::WardenToStudent,
                warden_id: UserId::new(),
                notes: Some("move-in".to_string()),
                occurred_at: test_time(),
            }))
            .unwrap();
        assignment.apply(&events[0]);
        assert!(assignment.pending_handover().is_some());

        let err = assignment
            .handle(&AssignmentCommand::RecordHandover(RecordHandover {
                assignment_id,
                direction: HandoverDirection::WardenToStudent,
                warden_id: UserId::new(),
                notes: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn confirm_without_pending_handover_is_a_conflict() {
        let (assignment, assignment_id, _) = assigned();
        let err = assignment
            .handle(&AssignmentCommand::ConfirmHandover(ConfirmHandover {
                assignment_id,
                warden_id: UserId::new(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn lost_key_blocks_handovers_until_replaced() {
        let (mut assignment, assignment_id, _) = assigned();

        let events = assignment
            .handle(&AssignmentCommand::ReportKeyLost(ReportKeyLost {
                assignment_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        assignment.apply(&events[0]);
        assert_eq!(assignment.key_status(), KeyStatus::Lost);

        let err = assignment
            .handle(&AssignmentCommand::RecordHandover(RecordHandover {
                assignment_id,
                direction: HandoverDirection::WardenToStudent,
                warden_id: UserId::new(),
                notes: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let events = assignment
            .handle(&AssignmentCommand::ReplaceKey(ReplaceKey {
                assignment_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        assignment.apply(&events[0]);
        assert_eq!(assignment.key_status(), KeyStatus::WithWarden);
    }

    #[test]
    fn losing_the_key_cancels_a_pending_handover() {
        let (mut assignment, assignment_id, _) = assigned();

        let events = assignment
            .handle(&AssignmentCommand::RecordHandover(RecordHandover {
                assignment_id,
                direction: HandoverDirection::WardenToStudent,
                warden_id: UserId::new(),
                notes: None,
                occurred_at: test_time(),
            }))
            .unwrap();
        assignment.apply(&events[0]);

        let events = assignment
            .handle(&AssignmentCommand::ReportKeyLost(ReportKeyLost {
                assignment_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        assignment.apply(&events[0]);

        assert!(assignment.pending_handover().is_none());
    }

    #[test]
    fn replace_requires_a_lost_key() {
        let (assignment, assignment_id, _) = assigned();
        let err = assignment
            .handle(&AssignmentCommand::ReplaceKey(ReplaceKey {
                assignment_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn commands_on_missing_assignments_are_not_found() {
        let assignment_id = test_assignment_id();
        let assignment = Assignment::empty(assignment_id);
        let err = assignment
            .handle(&AssignmentCommand::ReportKeyLost(ReportKeyLost {
                assignment_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }
}
