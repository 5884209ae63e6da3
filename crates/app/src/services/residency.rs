//! Room assignments and key custody.

use chrono::Utc;

use domus_auth::Role;
use domus_core::{AggregateId, DomainResult, UserId};
use domus_housing::RoomId;
use domus_notify::Severity;
use domus_residency::{
    AssignRoom, Assignment, AssignmentCommand, AssignmentEvent, AssignmentId, ConfirmHandover,
    HandoverDirection, RecordHandover, ReplaceKey, ReportKeyLost,
};

use crate::context::AppContext;
use crate::guard;
use crate::services::{room_label, student_name};

pub struct ResidencyService<'a> {
    pub(crate) ctx: &'a AppContext,
}

impl ResidencyService<'_> {
    pub fn assign_room(
        &self,
        student_id: UserId,
        room_id: RoomId,
        academic_year: &str,
    ) -> DomainResult<AssignmentId> {
        guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            "Only wardens can assign rooms.",
        )?;

        let assignment_id = AssignmentId::new(AggregateId::new());
        let events = self.execute(
            assignment_id,
            &AssignmentCommand::AssignRoom(AssignRoom {
                assignment_id,
                student_id,
                room_id,
                academic_year: academic_year.to_string(),
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Room Assigned",
            format!(
                "{} has been assigned to room {}.",
                student_name(self.ctx, student_id),
                room_label(self.ctx, room_id)
            ),
        );
        Ok(assignment_id)
    }

    pub fn record_handover(
        &self,
        assignment_id: AssignmentId,
        direction: HandoverDirection,
        notes: Option<String>,
    ) -> DomainResult<()> {
        let actor = guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            "Only wardens can create key handovers.",
        )?;

        let events = self.execute(
            assignment_id,
            &AssignmentCommand::RecordHandover(RecordHandover {
                assignment_id,
                direction,
                warden_id: actor.id,
                notes,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Handover Recorded",
            "Key handover has been recorded successfully.",
        );
        Ok(())
    }

    pub fn confirm_handover(&self, assignment_id: AssignmentId) -> DomainResult<()> {
        let actor = guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            "Only wardens can confirm key handovers.",
        )?;

        let events = self.execute(
            assignment_id,
            &AssignmentCommand::ConfirmHandover(ConfirmHandover {
                assignment_id,
                warden_id: actor.id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        let (who, room) = self
            .ctx
            .assignments
            .get(assignment_id)
            .map(|a| {
                (
                    student_name(self.ctx, a.student_id()),
                    room_label(self.ctx, a.room_id()),
                )
            })
            .unwrap_or_else(|| ("Student".to_string(), "Unknown Room".to_string()));

        self.ctx.notifications.push(
            Severity::Success,
            "Key Handover Confirmed",
            format!("Key handover for {who} ({room}) has been confirmed."),
        );
        Ok(())
    }

    /// Any authenticated user may report a key lost (students report their
    /// own; wardens report on a student's behalf).
    pub fn report_key_lost(&self, assignment_id: AssignmentId) -> DomainResult<()> {
        guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &[],
            "You must be signed in to report a lost key.",
        )?;

        let events = self.execute(
            assignment_id,
            &AssignmentCommand::ReportKeyLost(ReportKeyLost {
                assignment_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Warning,
            "Key Reported Lost",
            "The key has been marked as lost. Contact the sub-warden for a replacement.",
        );
        Ok(())
    }

    pub fn replace_key(&self, assignment_id: AssignmentId) -> DomainResult<()> {
        guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            "Only wardens can issue replacement keys.",
        )?;

        let events = self.execute(
            assignment_id,
            &AssignmentCommand::ReplaceKey(ReplaceKey {
                assignment_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Key Replaced",
            "A replacement key has been issued and is held by the warden.",
        );
        Ok(())
    }

    /// Unrestricted read of all assignments.
    pub fn assignments(&self) -> Vec<Assignment> {
        self.ctx.assignments.all()
    }

    pub fn assignment(&self, assignment_id: AssignmentId) -> Option<Assignment> {
        self.ctx.assignments.get(assignment_id)
    }

    fn execute(
        &self,
        assignment_id: AssignmentId,
        command: &AssignmentCommand,
    ) -> DomainResult<Vec<AssignmentEvent>> {
        self.ctx
            .assignments
            .execute(assignment_id, command)
            .map_err(|err| {
                guard::notify_failure(&self.ctx.notifications, &err);
                err
            })
    }
}
