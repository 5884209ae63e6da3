//! Process-scoped session state machine.

use std::sync::{Arc, Mutex};

use crate::{Account, CredentialVerifier, Role, authorize};

#[derive(Debug, Default)]
struct State {
    user: Option<Account>,
    loading: bool,
}

/// The record of which user, if any, is currently authenticated.
///
/// Two states: `Anonymous` and `Authenticated(user)`. A successful `login`
/// moves to `Authenticated`, `logout` moves back; a failed login is a
/// self-loop that leaves the current user untouched. There is no automatic
/// expiry — the session lives until explicit logout or process teardown.
///
/// At most one user is active at a time. The verifier is injected so tests
/// can substitute a deterministic fake without timing dependencies.
pub struct Session {
    verifier: Arc<dyn CredentialVerifier>,
    state: Mutex<State>,
}

impl Session {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            verifier,
            state: Mutex::new(State::default()),
        }
    }

    /// Authenticate against the injected verifier.
    ///
    /// Returns `true` and installs the account on success; returns `false`
    /// on unknown identifier or credential mismatch. Authentication failure
    /// is a normal result, not an error. While the verifier call is in
    /// flight `is_loading()` reports `true`; callers are expected to disable
    /// re-submission rather than this method serializing overlapping calls.
    pub async fn login(&self, email: &str, secret: &str) -> bool {
        self.state.lock().unwrap().loading = true;

        let verified = self.verifier.verify(email, secret).await;

        let mut state = self.state.lock().unwrap();
        state.loading = false;
        match verified {
            Some(account) => {
                tracing::info!(user = %account.id, role = %account.role, "login succeeded");
                state.user = Some(account);
                true
            }
            None => {
                tracing::warn!(email, "login rejected");
                false
            }
        }
    }

    /// Clear the current user unconditionally. Idempotent.
    pub fn logout(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(account) = state.user.take() {
            tracing::info!(user = %account.id, "logged out");
        }
    }

    pub fn current_user(&self) -> Option<Account> {
        self.state.lock().unwrap().user.clone()
    }

    /// Whether a login call is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// Whether the current user may perform an action restricted to
    /// `required` roles. See [`authorize::is_authorized`].
    pub fn is_authorized(&self, required: &[Role]) -> bool {
        authorize::is_authorized(self.state.lock().unwrap().user.as_ref(), required)
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("Session")
            .field("user", &state.user.as_ref().map(|a| a.id))
            .field("loading", &state.loading)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountDirectory;
    use domus_core::UserId;

    fn session_with(email: &str, secret: &str, role: Role) -> Session {
        let directory = AccountDirectory::new();
        directory.register(
            Account::new(UserId::new(), email, "Test", "Account", role),
            secret,
        );
        Session::new(Arc::new(directory))
    }

    #[tokio::test]
    async fn login_installs_the_account_on_success() {
        let session = session_with("warden@residence.test", "s3cret", Role::SubWarden);
        assert!(session.current_user().is_none());

        assert!(session.login("warden@residence.test", "s3cret").await);

        let user = session.current_user().expect("user installed");
        assert_eq!(user.email, "warden@residence.test");
        assert_eq!(user.role, Role::SubWarden);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn failed_login_leaves_current_user_unchanged() {
        let session = session_with("warden@residence.test", "s3cret", Role::SubWarden);

        assert!(!session.login("warden@residence.test", "wrong").await);
        assert!(session.current_user().is_none());

        // A failure after a successful login keeps the previous user.
        assert!(session.login("warden@residence.test", "s3cret").await);
        assert!(!session.login("nobody@residence.test", "s3cret").await);
        assert_eq!(
            session.current_user().map(|a| a.email),
            Some("warden@residence.test".to_string())
        );
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let session = session_with("s@residence.test", "pw", Role::Student);
        assert!(session.login("s@residence.test", "pw").await);

        session.logout();
        assert!(session.current_user().is_none());
        session.logout();
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn authorization_follows_the_session_state() {
        let session = session_with("s@residence.test", "pw", Role::Student);

        // Anonymous: always false, including the "any user" empty set.
        assert!(!session.is_authorized(&[]));
        assert!(!session.is_authorized(&Role::STAFF));

        assert!(session.login("s@residence.test", "pw").await);
        assert!(session.is_authorized(&[]));
        assert!(session.is_authorized(&[Role::Student]));
        assert!(!session.is_authorized(&Role::STAFF));

        session.logout();
        assert!(!session.is_authorized(&[]));
    }
}
