//! Maintenance reports.

use chrono::Utc;

use domus_auth::Role;
use domus_core::{AggregateId, DomainResult, UserId};
use domus_housing::RoomId;
use domus_maintenance::{
    AssignReport, CloseReport, Report, ReportCategory, ReportCommand, ReportEvent, ReportId,
    ReportPriority, ResolveReport, StartProgress, SubmitReport,
};
use domus_notify::Severity;

use crate::context::AppContext;
use crate::guard;

const DENIAL: &str = "Only wardens can manage maintenance reports.";

pub struct MaintenanceService<'a> {
    pub(crate) ctx: &'a AppContext,
}

impl MaintenanceService<'_> {
    /// Any authenticated user may file a report; the actor is recorded as
    /// the submitter.
    pub fn submit_report(
        &self,
        room_id: RoomId,
        category: ReportCategory,
        title: &str,
        description: &str,
        priority: ReportPriority,
    ) -> DomainResult<ReportId> {
        let actor = guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &[],
            "You must be signed in to submit a report.",
        )?;

        let report_id = ReportId::new(AggregateId::new());
        let events = self.execute(
            report_id,
            &ReportCommand::SubmitReport(SubmitReport {
                report_id,
                student_id: actor.id,
                room_id,
                category,
                title: title.to_string(),
                description: description.to_string(),
                priority,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Report Submitted",
            "Your maintenance report has been submitted successfully.",
        );
        Ok(report_id)
    }

    pub fn assign_report(&self, report_id: ReportId, staff_id: UserId) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            report_id,
            &ReportCommand::AssignReport(AssignReport {
                report_id,
                staff_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        let staff_name = self
            .ctx
            .directory
            .find_by_id(staff_id)
            .map(|account| account.full_name())
            .unwrap_or_else(|| "a staff member".to_string());
        self.ctx.notifications.push(
            Severity::Success,
            "Report Assigned",
            format!("The report has been assigned to {staff_name}."),
        );
        Ok(())
    }

    pub fn start_progress(&self, report_id: ReportId) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            report_id,
            &ReportCommand::StartProgress(StartProgress {
                report_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Info,
            "Report In Progress",
            "Work on the report has started.",
        );
        Ok(())
    }

    pub fn resolve_report(&self, report_id: ReportId) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            report_id,
            &ReportCommand::ResolveReport(ResolveReport {
                report_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Report Resolved",
            "The report has been marked as resolved.",
        );
        Ok(())
    }

    pub fn close_report(&self, report_id: ReportId) -> DomainResult<()> {
        guard::require_role(&self.ctx.session, &self.ctx.notifications, &Role::STAFF, DENIAL)?;

        let events = self.execute(
            report_id,
            &ReportCommand::CloseReport(CloseReport {
                report_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Report Closed",
            "The report has been closed.",
        );
        Ok(())
    }

    /// Unrestricted read of all reports.
    pub fn reports(&self) -> Vec<Report> {
        self.ctx.reports.all()
    }

    pub fn report(&self, report_id: ReportId) -> Option<Report> {
        self.ctx.reports.get(report_id)
    }

    fn execute(&self, report_id: ReportId, command: &ReportCommand) -> DomainResult<Vec<ReportEvent>> {
        self.ctx.reports.execute(report_id, command).map_err(|err| {
            guard::notify_failure(&self.ctx.notifications, &err);
            err
        })
    }
}
