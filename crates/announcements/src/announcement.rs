use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use domus_core::{Aggregate, AggregateId, AggregateRoot, DomainError, UserId};
use domus_events::DomainEvent;

/// Announcement identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnouncementId(pub AggregateId);

impl AnnouncementId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Category of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    General,
    Maintenance,
    Emergency,
    Event,
}

/// Display priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementPriority {
    Low,
    Medium,
    High,
}

/// Aggregate root: Announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    id: AnnouncementId,
    title: String,
    content: String,
    kind: AnnouncementKind,
    priority: AnnouncementPriority,
    /// Floors the announcement targets; `None` means the whole residence.
    target_floors: Option<Vec<i32>>,
    created_by: UserId,
    published_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    active: bool,
    version: u64,
    created: bool,
}

impl Announcement {
    /// Create an empty, not-yet-published aggregate instance for rehydration.
    pub fn empty(id: AnnouncementId) -> Self {
        Self {
            id,
            title: String::new(),
            content: String::new(),
            kind: AnnouncementKind::General,
            priority: AnnouncementPriority::Low,
            target_floors: None,
            created_by: UserId::from_uuid(uuid::Uuid::nil()),
            published_at: None,
            expires_at: None,
            active: false,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> AnnouncementId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> AnnouncementKind {
        self.kind
    }

    pub fn priority(&self) -> AnnouncementPriority {
        self.priority
    }

    pub fn target_floors(&self) -> Option<&[i32]> {
        self.target_floors.as_deref()
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the announcement should still be shown at `now`.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.map_or(true, |expiry| now < expiry)
    }
}

impl AggregateRoot for Announcement {
    type Id = AnnouncementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: PublishAnnouncement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAnnouncement {
    pub announcement_id: AnnouncementId,
    pub title: String,
    pub content: String,
    pub kind: AnnouncementKind,
    pub priority: AnnouncementPriority,
    pub target_floors: Option<Vec<i32>>,
    pub created_by: UserId,
    pub expires_at: Option<DateTime<Utc>>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReviseAnnouncement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviseAnnouncement {
    pub announcement_id: AnnouncementId,
    /// Optional new title (if None, keep existing).
    pub title: Option<String>,
    /// Optional new content (if None, keep existing).
    pub content: Option<String>,
    /// Optional new priority (if None, keep existing).
    pub priority: Option<AnnouncementPriority>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeactivateAnnouncement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivateAnnouncement {
    pub announcement_id: AnnouncementId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnouncementCommand {
    PublishAnnouncement(PublishAnnouncement),
    ReviseAnnouncement(ReviseAnnouncement),
    DeactivateAnnouncement(DeactivateAnnouncement),
}

/// Event: AnnouncementPublished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementPublished {
    pub announcement_id: AnnouncementId,
    pub title: String,
    pub content: String,
    pub kind: AnnouncementKind,
    pub priority: AnnouncementPriority,
    pub target_floors: Option<Vec<i32>>,
    pub created_by: UserId,
    pub expires_at: Option<DateTime<Utc>>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AnnouncementRevised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRevised {
    pub announcement_id: AnnouncementId,
    pub title: String,
    pub content: String,
    pub priority: AnnouncementPriority,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AnnouncementDeactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementDeactivated {
    pub announcement_id: AnnouncementId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnouncementEvent {
    AnnouncementPublished(AnnouncementPublished),
    AnnouncementRevised(AnnouncementRevised),
    AnnouncementDeactivated(AnnouncementDeactivated),
}

impl DomainEvent for AnnouncementEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AnnouncementEvent::AnnouncementPublished(_) => "announcements.announcement.published",
            AnnouncementEvent::AnnouncementRevised(_) => "announcements.announcement.revised",
            AnnouncementEvent::AnnouncementDeactivated(_) => {
                "announcements.announcement.deactivated"
            }
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AnnouncementEvent::AnnouncementPublished(e) => e.occurred_at,
            AnnouncementEvent::AnnouncementRevised(e) => e.occurred_at,
            AnnouncementEvent::AnnouncementDeactivated(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Announcement {
    type Command = AnnouncementCommand;
    type Event = AnnouncementEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AnnouncementEvent::AnnouncementPublished(e) => {
                self.id = e.announcement_id;
                self.title = e.title.clone();
                self.content = e.content.clone();
                self.kind = e.kind;
                self.priority = e.priority;
                self.target_floors = e.target_floors.clone();
                self.created_by = e.created_by;
                self.published_at = Some(e.occurred_at);
                self.expires_at = e.expires_at;
                self.active = true;
                self.created = true;
            }
            AnnouncementEvent::AnnouncementRevised(e) => {
                self.title = e.title.clone();
                self.content = e.content.clone();
                self.priority = e.priority;
            }
            AnnouncementEvent::AnnouncementDeactivated(_) => {
                self.active = false;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            AnnouncementCommand::PublishAnnouncement(cmd) => self.handle_publish(cmd),
            AnnouncementCommand::ReviseAnnouncement(cmd) => self.handle_revise(cmd),
            AnnouncementCommand::DeactivateAnnouncement(cmd) => self.handle_deactivate(cmd),
        }
    }
}

impl Announcement {
    fn ensure_published(&self, announcement_id: AnnouncementId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.id != announcement_id {
            return Err(DomainError::invariant("announcement_id mismatch"));
        }
        Ok(())
    }

    fn handle_publish(
        &self,
        cmd: &PublishAnnouncement,
    ) -> Result<Vec<AnnouncementEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("announcement already published"));
        }
        if cmd.title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if cmd.content.trim().is_empty() {
            return Err(DomainError::validation("content cannot be empty"));
        }

        Ok(vec![AnnouncementEvent::AnnouncementPublished(
            AnnouncementPublished {
                announcement_id: cmd.announcement_id,
                title: cmd.title.clone(),
                content: cmd.content.clone(),
                kind: cmd.kind,
                priority: cmd.priority,
                target_floors: cmd.target_floors.clone(),
                created_by: cmd.created_by,
                expires_at: cmd.expires_at,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_revise(
        &self,
        cmd: &ReviseAnnouncement,
    ) -> Result<Vec<AnnouncementEvent>, DomainError> {
        self.ensure_published(cmd.announcement_id)?;

        if !self.active {
            return Err(DomainError::invariant(
                "only an active announcement can be revised",
            ));
        }

        let new_title = cmd.title.clone().unwrap_or_else(|| self.title.clone());
        if new_title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        let new_content = cmd.content.clone().unwrap_or_else(|| self.content.clone());
        if new_content.trim().is_empty() {
            return Err(DomainError::validation("content cannot be empty"));
        }

        Ok(vec![AnnouncementEvent::AnnouncementRevised(
            AnnouncementRevised {
                announcement_id: cmd.announcement_id,
                title: new_title,
                content: new_content,
                priority: cmd.priority.unwrap_or(self.priority),
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_deactivate(
        &self,
        cmd: &DeactivateAnnouncement,
    ) -> Result<Vec<AnnouncementEvent>, DomainError> {
        self.ensure_published(cmd.announcement_id)?;

        if !self.active {
            return Err(DomainError::conflict("announcement is already inactive"));
        }

        Ok(vec![AnnouncementEvent::AnnouncementDeactivated(
            AnnouncementDeactivated {
                announcement_id: cmd.announcement_id,
                occurred_at: cmd.occurred_at,
            },
        )])
    }
}
