use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a notification.
///
/// Unique and monotonically assigned within the process lifetime.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Severity of a notification, determining its visual treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral informational message.
    Info,
    /// A successful operation or positive outcome.
    Success,
    /// A non-critical issue the user should be aware of.
    Warning,
    /// An error or failure, including denied actions.
    Error,
}

/// Optional follow-up attached to a notification: a label plus a
/// zero-argument trigger the UI can invoke.
#[derive(Clone)]
pub struct NotificationAction {
    label: String,
    trigger: Arc<dyn Fn() + Send + Sync>,
}

impl NotificationAction {
    pub fn new(label: impl Into<String>, trigger: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            trigger: Arc::new(trigger),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn invoke(&self) {
        (self.trigger)();
    }
}

impl core::fmt::Debug for NotificationAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A transient, in-memory record of user-facing feedback.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    /// Starts unread; only ever transitions unread → read.
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub action: Option<NotificationAction>,
}

impl Notification {
    /// Relative age string for display, e.g. "5m ago". See [`crate::relative_age`].
    pub fn age(&self, now: DateTime<Utc>) -> String {
        crate::relative_age(self.created_at, now)
    }
}
