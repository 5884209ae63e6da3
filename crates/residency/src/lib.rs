//! Residency domain module (room assignments and key custody, event-sourced).
//!
//! This crate contains business rules for student room assignments and the
//! key custody state machine, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod assignment;

pub use assignment::{
    AssignRoom, Assignment, AssignmentCommand, AssignmentEvent, AssignmentId, ConfirmHandover,
    HandoverConfirmed, HandoverDirection, HandoverRecorded, KeyLostReported, KeyReplaced,
    KeyStatus, PendingHandover, RecordHandover, ReplaceKey, ReportKeyLost, RoomAssigned,
};
