use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domus_core::{Aggregate, AggregateId, AggregateRoot, DomainError, UserId};
use domus_events::DomainEvent;
use domus_housing::RoomId;

/// Maintenance report identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub AggregateId);

impl ReportId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReportId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// What the report is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportCategory {
    Electrical,
    Plumbing,
    Furniture,
    Cleanliness,
    Other,
}

/// Urgency grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Report lifecycle.
///
/// Transitions move strictly forward: pending → in_progress → resolved →
/// closed. Skipping a stage is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl ReportStatus {
    pub fn is_open(self) -> bool {
        matches!(self, ReportStatus::Pending | ReportStatus::InProgress)
    }
}

/// Aggregate root: MaintenanceReport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    id: ReportId,
    student_id: UserId,
    room_id: RoomId,
    category: ReportCategory,
    title: String,
    description: String,
    priority: ReportPriority,
    status: ReportStatus,
    submitted_at: Option<DateTime<Utc>>,
    assigned_to: Option<UserId>,
    resolved_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Report {
    /// Create an empty, not-yet-submitted aggregate instance for rehydration.
    pub fn empty(id: ReportId) -> Self {
        Self {
            id,
            student_id: UserId::from_uuid(uuid::Uuid::nil()),
            room_id: RoomId::new(AggregateId::from_uuid(uuid::Uuid::nil())),
            category: ReportCategory::Other,
            title: String::new(),
            description: String::new(),
            priority: ReportPriority::Low,
            status: ReportStatus::Pending,
            submitted_at: None,
            assigned_to: None,
            resolved_at: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ReportId {
        self.id
    }

    pub fn student_id(&self) -> UserId {
        self.student_id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn category(&self) -> ReportCategory {
        self.category
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn priority(&self) -> ReportPriority {
        self.priority
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }
}

impl AggregateRoot for Report {
    type Id = ReportId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: SubmitReport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitReport {
    pub report_id: ReportId,
    pub student_id: UserId,
    pub room_id: RoomId,
    pub category: ReportCategory,
    pub title: String,
    pub description: String,
    pub priority: ReportPriority,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AssignReport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignReport {
    pub report_id: ReportId,
    pub staff_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: StartProgress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartProgress {
    pub report_id: ReportId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ResolveReport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveReport {
    pub report_id: ReportId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CloseReport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseReport {
    pub report_id: ReportId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportCommand {
    SubmitReport(SubmitReport),
    AssignReport(AssignReport),
    StartProgress(StartProgress),
    ResolveReport(ResolveReport),
    CloseReport(CloseReport),
}

/// Event: ReportSubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubmitted {
    pub report_id: ReportId,
    pub student_id: UserId,
    pub room_id: RoomId,
    pub category: ReportCategory,
    pub title: String,
    pub description: String,
    pub priority: ReportPriority,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReportAssigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAssigned {
    pub report_id: ReportId,
    pub staff_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProgressStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStarted {
    pub report_id: ReportId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReportResolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResolved {
    pub report_id: ReportId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ReportClosed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportClosed {
    pub report_id: ReportId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportEvent {
    ReportSubmitted(ReportSubmitted),
    ReportAssigned(ReportAssigned),
    ProgressStarted(ProgressStarted),
    ReportResolved(ReportResolved),
    ReportClosed(ReportClosed),
}

impl DomainEvent for ReportEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ReportEvent::ReportSubmitted(_) => "maintenance.report.submitted",
            ReportEvent::ReportAssigned(_) => "maintenance.report.assigned",
            ReportEvent::ProgressStarted(_) => "maintenance.report.progress_started",
            ReportEvent::ReportResolved(_) => "maintenance.report.resolved",
            ReportEvent::ReportClosed(_) => "maintenance.report.closed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ReportEvent::ReportSubmitted(e) => e.occurred_at,
            ReportEvent::ReportAssigned(e) => e.occurred_at,
            ReportEvent::ProgressStarted(e) => e.occurred_at,
            ReportEvent::ReportResolved(e) => e.occurred_at,
            ReportEvent::ReportClosed(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Report {
    type Command = ReportCommand;
    type Event = ReportEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ReportEvent::ReportSubmitted(e) => {
                self.id = e.report_id;
                self.student_id = e.student_id;
                self.room_id = e.room_id;
                self.category = e.category;
                self.title = e.title.clone();
                self.description = e.description.clone();
                self.priority = e.priority;
                self.status = ReportStatus::Pending;
                self.submitted_at = Some(e.occurred_at);
                self.created = true;
            }
            ReportEvent::ReportAssigned(e) => {
                self.assigned_to = Some(e.staff_id);
            }
            ReportEvent::ProgressStarted(_) => {
                self.status = ReportStatus::InProgress;
            }
            ReportEvent::ReportResolved(e) => {
                self.status = ReportStatus::Resolved;
                self.resolved_at = Some(e.occurred_at);
            }
            ReportEvent::ReportClosed(_) => {
                self.status = ReportStatus::Closed;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ReportCommand::SubmitReport(cmd) => self.handle_submit(cmd),
            ReportCommand::AssignReport(cmd) => self.handle_assign(cmd),
            ReportCommand::StartProgress(cmd) => self.handle_start(cmd),
            ReportCommand::ResolveReport(cmd) => self.handle_resolve(cmd),
            ReportCommand::CloseReport(cmd) => self.handle_close(cmd),
        }
    }
}

impl Report {
    fn ensure_submitted(&self, report_id: ReportId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.id != report_id {
            return Err(DomainError::invariant("report_id mismatch"));
        }
        Ok(())
    }

    fn handle_submit(&self, cmd: &SubmitReport) -> Result<Vec<ReportEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("report already submitted"));
        }
        if cmd.title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if cmd.description.trim().is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }

        Ok(vec![ReportEvent::ReportSubmitted(ReportSubmitted {
            report_id: cmd.report_id,
            student_id: cmd.student_id,
            room_id: cmd.room_id,
            category: cmd.category,
            title: cmd.title.clone(),
            description: cmd.description.clone(),
            priority: cmd.priority,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_assign(&self, cmd: &AssignReport) -> Result<Vec<ReportEvent>, DomainError> {
        self.ensure_submitted(cmd.report_id)?;

        if !self.status.is_open() {
            return Err(DomainError::invariant(
                "only an open report can be assigned",
            ));
        }

        Ok(vec![ReportEvent::ReportAssigned(ReportAssigned {
            report_id: cmd.report_id,
            staff_id: cmd.staff_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_start(&self, cmd: &StartProgress) -> Result<Vec<ReportEvent>, DomainError> {
        self.ensure_submitted(cmd.report_id)?;

        if self.status != ReportStatus::Pending {
            return Err(DomainError::invariant(
                "only a pending report can move to in_progress",
            ));
        }

        Ok(vec![ReportEvent::ProgressStarted(ProgressStarted {
            report_id: cmd.report_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_resolve(&self, cmd: &ResolveReport) -> Result<Vec<ReportEvent>, DomainError> {
        self.ensure_submitted(cmd.report_id)?;

        if self.status != ReportStatus::InProgress {
            return Err(DomainError::invariant(
                "only an in_progress report can be resolved",
            ));
        }

        Ok(vec![ReportEvent::ReportResolved(ReportResolved {
            report_id: cmd.report_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_close(&self, cmd: &CloseReport) -> Result<Vec<ReportEvent>, DomainError> {
        self.ensure_submitted(cmd.report_id)?;

        if self.status != ReportStatus::Resolved {
            return Err(DomainError::invariant(
                "only a resolved report can be closed",
            ));
        }

        Ok(vec![ReportEvent::ReportClosed(ReportClosed {
            report_id: cmd.report_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_report_id() -> ReportId {
        ReportId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn submitted() -> (Report, ReportId) {
        let report_id = test_report_id();
        let mut report = Report::empty(report_id);
        let events = report
            .handle(&ReportCommand::SubmitReport(SubmitReport {
                report_id,
                student_id: UserId::new(),
                room_id: RoomId::new(AggregateId::new()),
                category: ReportCategory::Plumbing,
                title: "Leaking tap".to_string(),
                description: "Constant drip in the bathroom sink.".to_string(),
                priority: ReportPriority::High,
                occurred_at: test_time(),
            }))
            .unwrap();
        report.apply(&events[0]);
        (report, report_id)
    }

    #[test]
    fn submit_report_emits_report_submitted_event() {
        let (report, _) = submitted();
        assert_eq!(report.status(), ReportStatus::Pending);
        assert_eq!(report.category(), ReportCategory::Plumbing);
        assert_eq!(report.priority(), ReportPriority::High);
        assert_eq!(report.title(), "Leaking tap");
    }

    #[test]
    fn submit_report_rejects_empty_fields() {
        let report_id = test_report_id();
        let report = Report::empty(report_id);

        let err = report
            .handle(&ReportCommand::SubmitReport(SubmitReport {
                report_id,
                student_id: UserId::new(),
                room_id: RoomId::new(AggregateId::new()),
                category: ReportCategory::Other,
                title: " ".to_string(),
                description: "x".to_string(),
                priority: ReportPriority::Low,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn lifecycle_moves_strictly_forward() {
        let (mut report, report_id) = submitted();

        // Pending cannot be resolved directly.
        let err = report
            .handle(&ReportCommand::ResolveReport(ResolveReport {
                report_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));

        let events = report
            .handle(&ReportCommand::StartProgress(StartProgress {
                report_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        report.apply(&events[0]);
        assert_eq!(report.status(), ReportStatus::InProgress);

        let events = report
            .handle(&ReportCommand::ResolveReport(ResolveReport {
                report_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        report.apply(&events[0]);
        assert_eq!(report.status(), ReportStatus::Resolved);
        assert!(report.resolved_at().is_some());

        let events = report
            .handle(&ReportCommand::CloseReport(CloseReport {
                report_id,
                occurred_at: test_time(),
            }))
            .unwrap();
        report.apply(&events[0]);
        assert_eq!(report.status(), ReportStatus::Closed);
    }

    #[test]
    fn assignment_is_only_allowed_while_open() {
        let (mut report, report_id) = submitted();
        let staff = UserId::new();

        let events = report
            .handle(&ReportCommand::AssignReport(AssignReport {
                report_id,
                staff_id: staff,
                occurred_at: test_time(),
            }))
            .unwrap();
        report.apply(&events[0]);
        assert_eq!(report.assigned_to(), Some(staff));

        for cmd in [
            ReportCommand::StartProgress(StartProgress {
                report_id,
                occurred_at: test_time(),
            }),
            ReportCommand::ResolveReport(ResolveReport {
                report_id,
                occurred_at: test_time(),
            }),
            ReportCommand::CloseReport(CloseReport {
                report_id,
                occurred_at: test_time(),
            }),
        ] {
            let events = report.handle(&cmd).unwrap();
            report.apply(&events[0]);
        }

        let err = report
            .handle(&ReportCommand::AssignReport(AssignReport {
                report_id,
                staff_id: UserId::new(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn commands_on_missing_reports_are_not_found() {
        let report_id = test_report_id();
        let report = Report::empty(report_id);
        let err = report
            .handle(&ReportCommand::StartProgress(StartProgress {
                report_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }
}
