//! The notification center itself.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;

use crate::{Notification, NotificationAction, NotificationId, Severity};

#[derive(Debug, Default)]
struct CenterState {
    next_id: u64,
    /// Newest first.
    entries: VecDeque<Notification>,
}

/// Process-wide event log for user feedback.
///
/// Owned exclusively by the composition root and shared by reference; all
/// mutation goes through these operations. None of them fail: unknown ids
/// are silently ignored, and the whole list is discarded with the process.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    state: Mutex<CenterState>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification. Always succeeds and returns the assigned id.
    pub fn push(
        &self,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> NotificationId {
        self.push_inner(severity, title.into(), message.into(), None)
    }

    /// Add a notification carrying a follow-up action.
    pub fn push_with_action(
        &self,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
        action: NotificationAction,
    ) -> NotificationId {
        self.push_inner(severity, title.into(), message.into(), Some(action))
    }

    fn push_inner(
        &self,
        severity: Severity,
        title: String,
        message: String,
        action: Option<NotificationAction>,
    ) -> NotificationId {
        let mut state = self.state.lock().unwrap();
        let id = NotificationId::new(state.next_id);
        state.next_id += 1;

        tracing::debug!(%id, ?severity, title, "notification added");
        state.entries.push_front(Notification {
            id,
            title,
            message,
            severity,
            read: false,
            created_at: Utc::now(),
            action,
        });
        id
    }

    /// Snapshot of the visible list, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().entries.iter().cloned().collect()
    }

    /// Number of unread entries, recomputed from the current list.
    pub fn unread_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .entries
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// Mark one entry read. No-op if the id is absent or already read.
    pub fn mark_as_read(&self, id: NotificationId) {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.entries.iter_mut().find(|n| n.id == id) {
            entry.read = true;
        }
    }

    /// Mark every entry read. No-op on an empty list.
    pub fn mark_all_as_read(&self) {
        let mut state = self.state.lock().unwrap();
        for entry in state.entries.iter_mut() {
            entry.read = true;
        }
    }

    /// Remove one entry. No-op if the id is absent.
    pub fn remove(&self, id: NotificationId) {
        let mut state = self.state.lock().unwrap();
        state.entries.retain(|n| n.id != id);
    }

    /// Empty the list unconditionally.
    pub fn clear(&self) {
        self.state.lock().unwrap().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().unwrap().entries.is_empty()
    }
}
