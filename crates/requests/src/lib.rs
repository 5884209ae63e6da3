//! Requests domain module (room requests, event-sourced).
//!
//! This crate contains business rules for room requests, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod request;

pub use request::{
    ApproveRequest, DenyRequest, ExpireRequest, RequestApproved, RequestCommand, RequestDenied,
    RequestEvent, RequestExpired, RequestId, RequestKind, RequestStatus, RequestSubmitted,
    RoomRequest, SubmitRequest,
};
