use serde::{Deserialize, Serialize};

use domus_core::UserId;

use crate::Role;

/// An authenticated identity.
///
/// Accounts are consumed by the session and the services; this crate does not
/// own their lifecycle. The role is immutable after creation (there is no
/// role-change flow in this system).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,

    /// Registry number, present for students only.
    pub student_number: Option<String>,
    pub phone_number: Option<String>,
    pub emergency_contact: Option<String>,
}

impl Account {
    /// Create a staff or student account with the optional fields unset.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
            student_number: None,
            phone_number: None,
            emergency_contact: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
