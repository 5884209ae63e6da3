//! The application context: explicitly-owned, dependency-injected state.
//!
//! Constructed once at application start and passed down to whatever drives
//! the screens; nothing in here is a global. Dropping the context discards
//! all state (there is no persistence).

use std::sync::Arc;

use domus_announcements::Announcement;
use domus_auth::{AccountDirectory, CredentialVerifier, Session};
use domus_events::{EventBus, InMemoryEventBus, Subscription};
use domus_housing::Room;
use domus_maintenance::Report;
use domus_notify::NotificationCenter;
use domus_requests::RoomRequest;
use domus_residency::Assignment;

use crate::events::AppEvent;
use crate::registry::Registry;
use crate::services::{
    AnnouncementService, HousingService, MaintenanceService, RequestService, ResidencyService,
};

/// Composition root for one running client.
pub struct AppContext {
    pub(crate) session: Session,
    pub(crate) notifications: NotificationCenter,
    pub(crate) bus: InMemoryEventBus<AppEvent>,
    pub(crate) directory: Arc<AccountDirectory>,
    pub(crate) rooms: Registry<Room>,
    pub(crate) assignments: Registry<Assignment>,
    pub(crate) reports: Registry<Report>,
    pub(crate) requests: Registry<RoomRequest>,
    pub(crate) announcements: Registry<Announcement>,
}

impl AppContext {
    /// Build a context whose session authenticates directly against the
    /// account directory.
    pub fn new(directory: Arc<AccountDirectory>) -> Self {
        let verifier: Arc<dyn CredentialVerifier> = directory.clone();
        Self::with_verifier(directory, verifier)
    }

    /// Build a context with a custom credential verifier (e.g. one that
    /// models remote latency, or a test fake).
    pub fn with_verifier(
        directory: Arc<AccountDirectory>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            session: Session::new(verifier),
            notifications: NotificationCenter::new(),
            bus: InMemoryEventBus::new(),
            directory,
            rooms: Registry::new(Room::empty),
            assignments: Registry::new(Assignment::empty),
            reports: Registry::new(Report::empty),
            requests: Registry::new(RoomRequest::empty),
            announcements: Registry::new(Announcement::empty),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    /// Subscribe to the stream of domain events emitted by the services.
    pub fn subscribe(&self) -> Subscription<AppEvent> {
        self.bus.subscribe()
    }

    pub fn housing(&self) -> HousingService<'_> {
        HousingService { ctx: self }
    }

    pub fn residency(&self) -> ResidencyService<'_> {
        ResidencyService { ctx: self }
    }

    pub fn maintenance(&self) -> MaintenanceService<'_> {
        MaintenanceService { ctx: self }
    }

    pub fn requests(&self) -> RequestService<'_> {
        RequestService { ctx: self }
    }

    pub fn announcements(&self) -> AnnouncementService<'_> {
        AnnouncementService { ctx: self }
    }

    /// Broadcast emitted events on the shared bus (best-effort).
    pub(crate) fn publish<E: Into<AppEvent>>(&self, events: Vec<E>) {
        for event in events {
            if let Err(err) = self.bus.publish(event.into()) {
                tracing::warn!(?err, "event publish failed");
            }
        }
    }
}
