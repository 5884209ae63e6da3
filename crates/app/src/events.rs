//! Application-level event wrapper published on the shared bus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domus_announcements::AnnouncementEvent;
use domus_events::DomainEvent;
use domus_housing::RoomEvent;
use domus_maintenance::ReportEvent;
use domus_requests::RequestEvent;
use domus_residency::AssignmentEvent;

/// Union of all domain events, as broadcast to bus subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    Room(RoomEvent),
    Assignment(AssignmentEvent),
    Report(ReportEvent),
    Request(RequestEvent),
    Announcement(AnnouncementEvent),
}

impl DomainEvent for AppEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AppEvent::Room(e) => e.event_type(),
            AppEvent::Assignment(e) => e.event_type(),
            AppEvent::Report(e) => e.event_type(),
            AppEvent::Request(e) => e.event_type(),
            AppEvent::Announcement(e) => e.event_type(),
        }
    }

    fn version(&self) -> u32 {
        match self {
            AppEvent::Room(e) => e.version(),
            AppEvent::Assignment(e) => e.version(),
            AppEvent::Report(e) => e.version(),
            AppEvent::Request(e) => e.version(),
            AppEvent::Announcement(e) => e.version(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AppEvent::Room(e) => e.occurred_at(),
            AppEvent::Assignment(e) => e.occurred_at(),
            AppEvent::Report(e) => e.occurred_at(),
            AppEvent::Request(e) => e.occurred_at(),
            AppEvent::Announcement(e) => e.occurred_at(),
        }
    }
}

impl From<RoomEvent> for AppEvent {
    fn from(value: RoomEvent) -> Self {
        AppEvent::Room(value)
    }
}

impl From<AssignmentEvent> for AppEvent {
    fn from(value: AssignmentEvent) -> Self {
        AppEvent::Assignment(value)
    }
}

impl From<ReportEvent> for AppEvent {
    fn from(value: ReportEvent) -> Self {
        AppEvent::Report(value)
    }
}

impl From<RequestEvent> for AppEvent {
    fn from(value: RequestEvent) -> Self {
        AppEvent::Request(value)
    }
}

impl From<AnnouncementEvent> for AppEvent {
    fn from(value: AnnouncementEvent) -> Self {
        AppEvent::Announcement(value)
    }
}
