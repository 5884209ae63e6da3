//! Role-gated application services.
//!
//! One service per feature area, each following the same contract: resolve
//! the acting account through the guard, execute the command against the
//! owning registry, broadcast the emitted events, and report the outcome
//! through the notification center. A rejected action never mutates state.

pub mod announcements;
pub mod housing;
pub mod maintenance;
pub mod requests;
pub mod residency;

pub use announcements::AnnouncementService;
pub use housing::HousingService;
pub use maintenance::MaintenanceService;
pub use requests::RequestService;
pub use residency::ResidencyService;

use domus_core::UserId;
use domus_housing::RoomId;

use crate::context::AppContext;

/// Display name for a student, falling back when the account is unknown.
pub(crate) fn student_name(ctx: &AppContext, student_id: UserId) -> String {
    ctx.directory
        .find_by_id(student_id)
        .map(|account| account.full_name())
        .unwrap_or_else(|| "Student".to_string())
}

/// Display label for a room, falling back when the room is unknown.
pub(crate) fn room_label(ctx: &AppContext, room_id: RoomId) -> String {
    ctx.rooms
        .get(room_id)
        .map(|room| room.room_number().to_string())
        .unwrap_or_else(|| "Unknown Room".to_string())
}
