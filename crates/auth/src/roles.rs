use serde::{Deserialize, Serialize};

/// Role of an account, controlling which actions are authorized.
///
/// This is a closed set: the system has no role-change flow, and every
/// authorization decision is an exhaustive match over these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Standard occupant of the residence.
    Student,
    /// Staff supervisor responsible for rooms, keys and requests.
    SubWarden,
    /// Staff supervisor responsible for student welfare.
    WelfareOfficer,
}

impl Role {
    /// The two staff supervisor roles.
    ///
    /// Most mutating operations are gated on exactly this set.
    pub const STAFF: [Role; 2] = [Role::SubWarden, Role::WelfareOfficer];

    pub fn is_staff(self) -> bool {
        matches!(self, Role::SubWarden | Role::WelfareOfficer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::SubWarden => "sub_warden",
            Role::WelfareOfficer => "welfare_officer",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
