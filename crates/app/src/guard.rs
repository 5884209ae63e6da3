//! Authorization guard for the application services.
//!
//! Enforces the contract that every role-gated mutation checks the session
//! **before** touching any registry, and that every rejection is visible to
//! the user: a denied action produces a "Permission Denied" notification and
//! nothing else happens.

use domus_auth::{Account, Role, Session, authorize};
use domus_core::DomainError;
use domus_notify::{NotificationCenter, Severity};

/// Resolve the acting account, requiring one of `required` roles.
///
/// An empty `required` set admits any authenticated user. On failure the
/// denial is pushed to the notification center and `Unauthorized` is
/// returned; the caller must not mutate anything.
pub fn require_role(
    session: &Session,
    notifications: &NotificationCenter,
    required: &[Role],
    denial_message: &str,
) -> Result<Account, DomainError> {
    let user = session.current_user();
    match authorize(user.as_ref(), required) {
        // authorize() never passes without a user present.
        Ok(()) => user.ok_or(DomainError::Unauthorized),
        Err(reason) => {
            tracing::warn!(%reason, "action denied");
            notifications.push(Severity::Error, "Permission Denied", denial_message);
            Err(DomainError::Unauthorized)
        }
    }
}

/// Report a failed (non-authorization) operation through the notification
/// center. Authorization denials are already reported by [`require_role`].
pub fn notify_failure(notifications: &NotificationCenter, err: &DomainError) {
    match err {
        DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
            notifications.push(Severity::Error, "Validation Error", msg.clone());
        }
        DomainError::Conflict(msg) | DomainError::InvariantViolation(msg) => {
            notifications.push(Severity::Warning, "Action Not Allowed", msg.clone());
        }
        DomainError::NotFound => {
            notifications.push(
                Severity::Warning,
                "Not Found",
                "The requested record no longer exists.",
            );
        }
        DomainError::Unauthorized => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domus_auth::AccountDirectory;
    use domus_core::UserId;
    use std::sync::Arc;

    async fn student_session() -> Session {
        let directory = AccountDirectory::new();
        directory.register(
            Account::new(
                UserId::new(),
                "s@residence.test",
                "Sam",
                "Student",
                Role::Student,
            ),
            "pw",
        );
        let session = Session::new(Arc::new(directory));
        assert!(session.login("s@residence.test", "pw").await);
        session
    }

    #[tokio::test]
    async fn denial_pushes_a_permission_denied_notification() {
        let session = student_session().await;
        let notifications = NotificationCenter::new();

        let err = require_role(
            &session,
            &notifications,
            &Role::STAFF,
            "Only wardens can confirm key handovers.",
        )
        .unwrap_err();

        assert_eq!(err, DomainError::Unauthorized);
        let list = notifications.notifications();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Permission Denied");
        assert_eq!(list[0].severity, Severity::Error);
        assert_eq!(list[0].message, "Only wardens can confirm key handovers.");
    }

    #[tokio::test]
    async fn success_returns_the_acting_account_without_noise() {
        let session = student_session().await;
        let notifications = NotificationCenter::new();

        let account = require_role(&session, &notifications, &[], "unused").unwrap();
        assert_eq!(account.role, Role::Student);
        assert!(notifications.is_empty());
    }
}
