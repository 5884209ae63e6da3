//! `domus-notify` — process-wide, in-memory notification center.
//!
//! Cross-cutting user feedback (success/error/info/warning) decoupled from
//! whichever service triggered it. Feeds an unread badge and a dismissible
//! panel; nothing here persists across process teardown.

pub mod age;
pub mod center;
pub mod notification;

pub use age::relative_age;
pub use center::NotificationCenter;
pub use notification::{Notification, NotificationAction, NotificationId, Severity};
