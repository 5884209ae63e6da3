//! Maintenance domain module (fault reports, event-sourced).
//!
//! This crate contains business rules for maintenance reports, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod report;

pub use report::{
    AssignReport, CloseReport, ProgressStarted, Report, ReportAssigned, ReportCategory,
    ReportClosed, ReportCommand, ReportEvent, ReportId, ReportPriority, ReportResolved,
    ReportStatus, ReportSubmitted, ResolveReport, StartProgress, SubmitReport,
};
