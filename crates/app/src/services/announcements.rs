//! Residence announcements.

use chrono::{DateTime, Utc};

use domus_announcements::{
    Announcement, AnnouncementCommand, AnnouncementEvent, AnnouncementId, AnnouncementKind,
    AnnouncementPriority, DeactivateAnnouncement, PublishAnnouncement, ReviseAnnouncement,
};
use domus_auth::Role;
use domus_core::{AggregateId, DomainResult};
use domus_notify::Severity;

use crate::context::AppContext;
use crate::guard;

pub struct AnnouncementService<'a> {
    pub(crate) ctx: &'a AppContext,
}

impl AnnouncementService<'_> {
    pub fn publish_announcement(
        &self,
        title: &str,
        content: &str,
        kind: AnnouncementKind,
        priority: AnnouncementPriority,
        target_floors: Option<Vec<i32>>,
        expires_at: Option<DateTime<Utc>>,
    ) -> DomainResult<AnnouncementId> {
        let actor = guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            "Only wardens can create announcements.",
        )?;

        let announcement_id = AnnouncementId::new(AggregateId::new());
        let events = self.execute(
            announcement_id,
            &AnnouncementCommand::PublishAnnouncement(PublishAnnouncement {
                announcement_id,
                title: title.to_string(),
                content: content.to_string(),
                kind,
                priority,
                target_floors,
                created_by: actor.id,
                expires_at,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Announcement Created",
            "The announcement has been published successfully.",
        );
        Ok(announcement_id)
    }

    pub fn revise_announcement(
        &self,
        announcement_id: AnnouncementId,
        title: Option<String>,
        content: Option<String>,
        priority: Option<AnnouncementPriority>,
    ) -> DomainResult<()> {
        guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            "Only wardens can edit announcements.",
        )?;

        let events = self.execute(
            announcement_id,
            &AnnouncementCommand::ReviseAnnouncement(ReviseAnnouncement {
                announcement_id,
                title,
                content,
                priority,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Announcement Updated",
            "The announcement has been updated successfully.",
        );
        Ok(())
    }

    pub fn deactivate_announcement(&self, announcement_id: AnnouncementId) -> DomainResult<()> {
        guard::require_role(
            &self.ctx.session,
            &self.ctx.notifications,
            &Role::STAFF,
            "Only wardens can delete announcements.",
        )?;

        let events = self.execute(
            announcement_id,
            &AnnouncementCommand::DeactivateAnnouncement(DeactivateAnnouncement {
                announcement_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.ctx.publish(events);

        self.ctx.notifications.push(
            Severity::Success,
            "Announcement Removed",
            "The announcement has been removed.",
        );
        Ok(())
    }

    /// Unrestricted read of all announcements.
    pub fn announcements(&self) -> Vec<Announcement> {
        self.ctx.announcements.all()
    }

    /// Announcements that are active and unexpired at `now`.
    pub fn current(&self, now: DateTime<Utc>) -> Vec<Announcement> {
        self.ctx
            .announcements
            .all()
            .into_iter()
            .filter(|a| a.is_current(now))
            .collect()
    }

    pub fn announcement(&self, announcement_id: AnnouncementId) -> Option<Announcement> {
        self.ctx.announcements.get(announcement_id)
    }

    fn execute(
        &self,
        announcement_id: AnnouncementId,
        command: &AnnouncementCommand,
    ) -> DomainResult<Vec<AnnouncementEvent>> {
        self.ctx
            .announcements
            .execute(announcement_id, command)
            .map_err(|err| {
                guard::notify_failure(&self.ctx.notifications, &err);
                err
            })
    }
}
