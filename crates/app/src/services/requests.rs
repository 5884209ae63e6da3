//! Room requests.

use chrono::{DateTime, Utc};

use domus_auth::Role;
use domus_core::{AggregateId, DomainResult};
use domus_housing::RoomId;
use domus_notify::Severity;
use domus_requests::{
    ApproveRequest, DenyRequest, ExpireRequest, RequestCommand, RequestEvent, RequestId,
    RequestKind, RoomRequest, SubmitRequest,
};

use crate::context::AppContext;
use crate::guard;
use crate::services::student_name;

const REVIEW_DENIAL: &str = "Only wardens can approve or deny requests.";

pub struct RequestService<'a> {
    pub(crate) ctx: &'a AppContext,
}

impl RequestService<'_> {
    /// Any authenticated user may submit a request; the actor is recorded as
    /// the requesting student.
    pub fn submit_request(
        &self,
        kind: RequestKind,
        reason: &str,
        preferred_rooms: Vec<RoomId>,
        requested_date: DateTime<Utc>,
        duration_days: u32,
    ) -> DomainResult<RequestId> {
        let actor = guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &[],
            "You must be signed in to submit a request.",
        )?;

        let request_id = RequestId::new(AggregateId::new());
        let events = self.execute(
            request_id,
            &RequestCommand::SubmitRequest(SubmitRequest {
                request_id,
                student_id: actor.id,
                kind,
                reason: reason.to_string(),
                preferred_rooms,
                requested_date,
                duration_days,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Request Submitted",
            "Your room request has been submitted successfully.",
        );
        Ok(request_id)
    }

    pub fn approve_request(
        &self,
        request_id: RequestId,
        notes: Option<String>,
    ) -> DomainResult<()> {
        let actor = guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            REVIEW_DENIAL,
        )?;

        let events = self.execute(
            request_id,
            &RequestCommand::ApproveRequest(ApproveRequest {
                request_id,
                reviewer_id: actor.id,
                notes,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Request Approved",
            self.review_message(request_id, "approved"),
        );
        Ok(())
    }

    pub fn deny_request(&self, request_id: RequestId, notes: Option<String>) -> DomainResult<()> {
        let actor = guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            REVIEW_DENIAL,
        )?;

        let events = self.execute(
            request_id,
            &RequestCommand::DenyRequest(DenyRequest {
                request_id,
                reviewer_id: actor.id,
                notes,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Warning,
            "Request Denied",
            self.review_message(request_id, "denied"),
        );
        Ok(())
    }

    pub fn expire_request(&self, request_id: RequestId) -> DomainResult<()> {
        guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            REVIEW_DENIAL,
        )?;

        let events = self.execute(
            request_id,
            &RequestCommand::ExpireRequest(ExpireRequest {
                request_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Info,
            "Request Expired",
            "The request has expired without a decision.",
        );
        Ok(())
    }

    /// Unrestricted read of all requests.
    pub fn requests(&self) -> Vec<RoomRequest> {
        self.ctx.requests.all()
    }

    pub fn request(&self, request_id: RequestId) -> Option<RoomRequest> {
        self.ctx.requests.get(request_id)
    }

    fn review_message(&self, request_id: RequestId, decision: &str) -> String {
        match self.ctx.requests.get(request_id) {
            Some(request) => format!(
                "{}'s {} request has been {decision}.",
                student_name(self.ctx, request.student_id()),
                request.kind()
            ),
            None => format!("The request has been {decision}."),
        }
    }

    fn execute(
        &self,
        request_id: RequestId,
        command: &RequestCommand,
    ) -> DomainResult<Vec<RequestEvent>> {
        self.ctx.requests.execute(request_id, command).map_err(|err| {
            guard::notify_failure(&self.ctx.notifications, &err);
            err
        })
    }
}
