use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domus_core::{Aggregate, AggregateId, AggregateRoot, DomainError, UserId};
use domus_events::DomainEvent;
use domus_housing::RoomId;

/// Room request identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub AggregateId);

impl RequestId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for RequestId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Why the room is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Temporary,
    Interview,
    Medical,
    Other,
}

impl RequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Temporary => "temporary",
            RequestKind::Interview => "interview",
            RequestKind::Medical => "medical",
            RequestKind::Other => "other",
        }
    }
}

impl core::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request lifecycle. Review decisions are only taken from `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
    Expired,
}

/// Aggregate root: RoomRequest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRequest {
    id: RequestId,
    student_id: UserId,
    kind: RequestKind,
    reason: String,
    preferred_rooms: Vec<RoomId>,
    requested_date: DateTime<Utc>,
    duration_days: u32,
    status: RequestStatus,
    reviewed_by: Option<UserId>,
    reviewed_at: Option<DateTime<Utc>>,
    review_notes: Option<String>,
    version: u64,
    created: bool,
}

impl RoomRequest {
    /// Create an empty, not-yet-submitted aggregate instance for rehydration.
    pub fn empty(id: RequestId) -> Self {
        Self {
            id,
            student_id: UserId::from_uuid(uuid::Uuid::nil()),
            kind: RequestKind::Other,
            reason: String::new(),
            preferred_rooms: Vec::new(),
            requested_date: DateTime::<Utc>::UNIX_EPOCH,
            duration_days: 0,
            status: RequestStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> RequestId {
        self.id
    }

    pub fn student_id(&self) -> UserId {
        self.student_id
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn preferred_rooms(&self) -> &[RoomId] {
        &self.preferred_rooms
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn reviewed_by(&self) -> Option<UserId> {
        self.reviewed_by
    }

    pub fn review_notes(&self) -> Option<&str> {
        self.review_notes.as_deref()
    }
}

impl AggregateRoot for RoomRequest {
    type Id = RequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SubmitRequest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub request_id: RequestId,
    pub student_id: UserId,
    pub kind: RequestKind,
    pub reason: String,
    pub preferred_rooms: Vec<RoomId>,
    pub requested_date: DateTime<Utc>,
    pub duration_days: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApproveRequest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveRequest {
    pub request_id: RequestId,
    pub reviewer_id: UserId,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DenyRequest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyRequest {
    pub request_id: RequestId,
    pub reviewer_id: UserId,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ExpireRequest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpireRequest {
    pub request_id: RequestId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestCommand {
    SubmitRequest(SubmitRequest),
    ApproveRequest(ApproveRequest),
    DenyRequest(DenyRequest),
    ExpireRequest(ExpireRequest),
}

/// Event: RequestSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSubmitted {
    pub request_id: RequestId,
    pub student_id: UserId,
    pub kind: RequestKind,
    pub reason: String,
    pub preferred_rooms: Vec<RoomId>,
    pub requested_date: DateTime<Utc>,
    pub duration_days: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RequestApproved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestApproved {
    pub request_id: RequestId,
    pub reviewer_id: UserId,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RequestDenied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDenied {
    pub request_id: RequestId,
    pub reviewer_id: UserId,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: RequestExpired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestExpired {
    pub request_id: RequestId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestEvent {
    RequestSubmitted(RequestSubmitted),
    RequestApproved(RequestApproved),
    RequestDenied(RequestDenied),
    RequestExpired(RequestExpired),
}

impl DomainEvent for RequestEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RequestEvent::RequestSubmitted(_) => "requests.room_request.submitted",
            RequestEvent::RequestApproved(_) => "requests.room_request.approved",
            RequestEvent::RequestDenied(_) => "requests.room_request.denied",
            RequestEvent::RequestExpired(_) => "requests.room_request.expired",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RequestEvent::RequestSubmitted(e) => e.occurred_at,
            RequestEvent::RequestApproved(e) => e.occurred_at,
            RequestEvent::RequestDenied(e) => e.occurred_at,
            RequestEvent::RequestExpired(e) => e.occurred_at,
        }
    }
}

impl Aggregate for RoomRequest {
    type Command = RequestCommand;
    type Event = RequestEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            RequestEvent::RequestSubmitted(e) => {
                self.id = e.request_id;
                self.student_id = e.student_id;
                self.kind = e.kind;
                self.reason = e.reason.clone();
                self.preferred_rooms = e.preferred_rooms.clone();
                self.requested_date = e.requested_date;
                self.duration_days = e.duration_days;
                self.status = RequestStatus::Pending;
                self.created = true;
            }
            RequestEvent::RequestApproved(e) => {
                self.status = RequestStatus::Approved;
                self.reviewed_by = Some(e.reviewer_id);
                self.reviewed_at = Some(e.occurred_at);
                self.review_notes = e.notes.clone();
            }
            RequestEvent::RequestDenied(e) => {
                self.status = RequestStatus::Denied;
                self.reviewed_by = Some(e.reviewer_id);
                self.reviewed_at = Some(e.occurred_at);
                self.review_notes = e.notes.clone();
            }
            RequestEvent::RequestExpired(_) => {
                self.status = RequestStatus::Expired;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            RequestCommand::SubmitRequest(cmd) => self.handle_submit(cmd),
            RequestCommand::ApproveRequest(cmd) => self.handle_approve(cmd),
            RequestCommand::DenyRequest(cmd) => self.handle_deny(cmd),
            RequestCommand::ExpireRequest(cmd) => self.handle_expire(cmd),
        }
    }
}

impl RoomRequest {
    fn ensure_submitted(&self, request_id: RequestId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.id != request_id {
            return Err(DomainError::invariant("request_id mismatch"));
        }
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.status != RequestStatus::Pending {
            return Err(DomainError::conflict("request has already been reviewed"));
        }
        Ok(())
    }

    fn handle_submit(&self, cmd: &SubmitRequest) -> Result<Vec<RequestEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("request already submitted"));
        }
        if cmd.reason.trim().is_empty() {
            return Err(DomainError::validation("reason cannot be empty"));
        }
        if cmd.duration_days == 0 {
            return Err(DomainError::validation("duration must be at least one day"));
        }

        Ok(vec![RequestEvent::RequestSubmitted(RequestSubmitted {
            request_id: cmd.request_id,
            student_id: cmd.student_id,
            kind: cmd.kind,
            reason: cmd.reason.clone(),
            preferred_rooms: cmd.preferred_rooms.clone(),
            requested_date: cmd.requested_date,
            duration_days: cmd.duration_days,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_approve(&self, cmd: &ApproveRequest) -> Result<Vec<RequestEvent>, DomainError> {
        self.ensure_submitted(cmd.request_id)?;
        self.ensure_pending()?;

        Ok(vec![RequestEvent::RequestApproved(RequestApproved {
            request_id: cmd.request_id,
            reviewer_id: cmd.reviewer_id,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_deny(&self, cmd: &DenyRequest) -> Result<Vec<RequestEvent>, DomainError> {
        self.ensure_submitted(cmd.request_id)?;
        self.ensure_pending()?;

        Ok(vec![RequestEvent::RequestDenied(RequestDenied {
            request_id: cmd.request_id,
            reviewer_id: cmd.reviewer_id,
            notes: cmd.notes.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_expire(&self, cmd: &ExpireRequest) -> Result<Vec<RequestEvent>, DomainError> {
        self.ensure_submitted(cmd.request_id)?;
        self.ensure_pending()?;

        Ok(vec![RequestEvent::RequestExpired(RequestExpired {
            request_id: cmd.request_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_request_id() -> RequestId {
        RequestId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn submitted() -> (RoomRequest, RequestId) {
        let request_id = test_request_id();
        let mut request = RoomRequest::empty(request_id);
        let events = request
            .handle(&RequestCommand::SubmitRequest(SubmitRequest {
                request_id,
                student_id: UserId::new(),
                kind: RequestKind::Medical,
                reason: "Ground-floor room needed after surgery.".to_string(),
                preferred_rooms: vec![RoomId::new(AggregateId::new())],
                requested_date: test_time(),
                duration_days: 14,
                occurred_at: test_time(),
            }))
            .unwrap();
        request.apply(&events[0]);
        (request, request_id)
    }

    #[test]
    fn submit_request_starts_pending() {
        let (request, _) = submitted();
        assert_eq!(request.status(), RequestStatus::Pending);
        assert_eq!(request.kind(), RequestKind::Medical);
        assert_eq!(request.duration_days(), 14);
    }

    #[test]
    fn submit_request_rejects_empty_reason_and_zero_duration() {
        let request_id = test_request_id();
        let request = RoomRequest::empty(request_id);

        let err = request
            .handle(&RequestCommand::SubmitRequest(SubmitRequest {
                request_id,
                student_id: UserId::new(),
                kind: RequestKind::Temporary,
                reason: "   ".to_string(),
                preferred_rooms: Vec::new(),
                requested_date: test_time(),
                duration_days: 3,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = request
            .handle(&RequestCommand::SubmitRequest(SubmitRequest {
                request_id,
                student_id: UserId::new(),
                kind: RequestKind::Temporary,
                reason: "Exam week".to_string(),
                preferred_rooms: Vec::new(),
                requested_date: test_time(),
                duration_days: 0,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn approve_records_the_reviewer_and_notes() {
        let (mut request, request_id) = submitted();
        let reviewer = UserId::new();

        let events = request
            .handle(&RequestCommand::ApproveRequest(ApproveRequest {
                request_id,
                reviewer_id: reviewer,
                notes: Some("Room 12 free that week".to_string()),
                occurred_at: test_time(),
            }))
            .unwrap();
        request.apply(&events[0]);

        assert_eq!(request.status(), RequestStatus::Approved);
        assert_eq!(request.reviewed_by(), Some(reviewer));
        assert_eq!(request.review_notes(), Some("Room 12 free that week"));
    }

    #[test]
    fn review_decisions_only_from_pending() {
        let (mut request, request_id) = submitted();

        let events = request
            .handle(&RequestCommand::DenyRequest(DenyRequest {
                request_id,
                reviewer_id: UserId::new(),
                notes: None,
                occurred_at: test_time(),
            }))
            .unwrap();
        request.apply(&events[0]);
        assert_eq!(request.status(), RequestStatus::Denied);

        let err = request
            .handle(&RequestCommand::ApproveRequest(ApproveRequest {
                request_id,
                reviewer_id: UserId::new(),
                notes: None,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let err = request
            .handle(&RequestCommand::ExpireRequest(ExpireRequest {
                request_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn expire_moves_a_pending_request_to_expired() {
        let (mut request, request_id) = submitted();
        let events = request
            .handle(&RequestCommand::ExpireRequest(ExpireRequest {
                request_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        request.apply(&events[0]);
        assert_eq!(request.status(), RequestStatus::Expired);
    }

    #[test]
    fn commands_on_missing_requests_are_not_found() {
        let request_id = test_request_id();
        let request = RoomRequest::empty(request_id);
        let err = request
            .handle(&RequestCommand::ExpireRequest(ExpireRequest {
                request_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }
}
