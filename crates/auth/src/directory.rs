//! Credential verification seam.
//!
//! The session treats authentication as a remote call behind
//! [`CredentialVerifier`]; tests substitute a deterministic fake, the demo
//! wires an [`AccountDirectory`] seeded with fixture accounts.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::{Account, Role};

/// External authentication collaborator.
///
/// `verify` resolves to the matching account iff the identifier is known and
/// the secret matches; `None` is the normal (non-exceptional) failure result.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, email: &str, secret: &str) -> Option<Account>;
}

/// In-memory account directory with per-account secret digests.
///
/// Secrets are stored as SHA-256 digests; the plaintext never outlives the
/// `register` call. Lookup is by email, case-sensitive.
#[derive(Debug, Default)]
pub struct AccountDirectory {
    entries: Mutex<HashMap<String, (Account, [u8; 32])>>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account with its login secret. Replaces any existing entry for
    /// the same email.
    pub fn register(&self, account: Account, secret: &str) {
        let digest = secret_digest(secret);
        self.entries
            .lock()
            .unwrap()
            .insert(account.email.clone(), (account, digest));
    }

    pub fn find_by_email(&self, email: &str) -> Option<Account> {
        self.entries
            .lock()
            .unwrap()
            .get(email)
            .map(|(account, _)| account.clone())
    }

    pub fn find_by_id(&self, id: domus_core::UserId) -> Option<Account> {
        self.entries
            .lock()
            .unwrap()
            .values()
            .find(|(account, _)| account.id == id)
            .map(|(account, _)| account.clone())
    }

    /// All registered accounts, in no particular order.
    pub fn accounts(&self) -> Vec<Account> {
        self.entries
            .lock()
            .unwrap()
            .values()
            .map(|(account, _)| account.clone())
            .collect()
    }

    /// Registered accounts holding the given role.
    pub fn accounts_with_role(&self, role: Role) -> Vec<Account> {
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|(account, _)| account.role == role)
            .map(|(account, _)| account.clone())
            .collect()
    }
}

#[async_trait]
impl CredentialVerifier for AccountDirectory {
    async fn verify(&self, email: &str, secret: &str) -> Option<Account> {
        let entries = self.entries.lock().unwrap();
        let (account, expected) = entries.get(email)?;
        if secret_digest(secret) == *expected {
            Some(account.clone())
        } else {
            None
        }
    }
}

fn secret_digest(secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domus_core::UserId;

    fn directory_with(email: &str, secret: &str, role: Role) -> AccountDirectory {
        let directory = AccountDirectory::new();
        directory.register(Account::new(UserId::new(), email, "A", "B", role), secret);
        directory
    }

    #[tokio::test]
    async fn verify_accepts_the_registered_secret_only() {
        let directory = directory_with("w@residence.test", "hunter2", Role::SubWarden);

        let found = directory.verify("w@residence.test", "hunter2").await;
        assert_eq!(found.map(|a| a.role), Some(Role::SubWarden));

        assert!(directory.verify("w@residence.test", "wrong").await.is_none());
        assert!(directory.verify("unknown@residence.test", "hunter2").await.is_none());
    }

    #[test]
    fn accounts_with_role_filters() {
        let directory = directory_with("s@residence.test", "pw", Role::Student);
        directory.register(
            Account::new(UserId::new(), "w@residence.test", "C", "D", Role::SubWarden),
            "pw",
        );

        assert_eq!(directory.accounts().len(), 2);
        assert_eq!(directory.accounts_with_role(Role::Student).len(), 1);
        assert_eq!(directory.accounts_with_role(Role::WelfareOfficer).len(), 0);
    }
}
