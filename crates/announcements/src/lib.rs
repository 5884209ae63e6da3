//! Announcements domain module (event-sourced).
//!
//! This crate contains business rules for residence announcements,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage).

pub mod announcement;

pub use announcement::{
    Announcement, AnnouncementCommand, AnnouncementDeactivated, AnnouncementEvent, AnnouncementId,
    AnnouncementKind, AnnouncementPriority, AnnouncementPublished, AnnouncementRevised,
    DeactivateAnnouncement, PublishAnnouncement, ReviseAnnouncement,
};
