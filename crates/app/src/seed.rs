//! Fixture accounts for the demo binary and integration tests.

use std::sync::Arc;

use domus_auth::{Account, AccountDirectory, Role};
use domus_core::UserId;

/// Login secret shared by the fixture accounts.
pub const DEMO_SECRET: &str = "open-sesame";

pub const STUDENT_EMAIL: &str = "john.doe@university.edu";
pub const SUB_WARDEN_EMAIL: &str = "warden@university.edu";
pub const WELFARE_OFFICER_EMAIL: &str = "welfare@university.edu";

/// Directory seeded with one account per role.
pub fn demo_directory() -> Arc<AccountDirectory> {
    let directory = AccountDirectory::new();

    let mut student = Account::new(
        UserId::new(),
        STUDENT_EMAIL,
        "John",
        "Doe",
        Role::Student,
    );
    student.student_number = Some("STU2026001".to_string());
    student.phone_number = Some("+1234567890".to_string());
    student.emergency_contact = Some("+1234567891".to_string());
    directory.register(student, DEMO_SECRET);

    directory.register(
        Account::new(
            UserId::new(),
            SUB_WARDEN_EMAIL,
            "Alice",
            "Smith",
            Role::SubWarden,
        ),
        DEMO_SECRET,
    );

    directory.register(
        Account::new(
            UserId::new(),
            WELFARE_OFFICER_EMAIL,
            "Bob",
            "Johnson",
            Role::WelfareOfficer,
        ),
        DEMO_SECRET,
    );

    Arc::new(directory)
}
