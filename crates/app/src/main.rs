//! Demo driver: seeds fixture accounts and walks a warden/student session
//! through the services, then prints the notification feed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result, ensure};
use async_trait::async_trait;
use chrono::Utc;

use domus_announcements::{AnnouncementKind, AnnouncementPriority};
use domus_app::{AppContext, seed};
use domus_auth::{Account, AccountDirectory, CredentialVerifier};
use domus_housing::{FurnitureCondition, FurnitureKind};
use domus_maintenance::{ReportCategory, ReportPriority};
use domus_requests::RequestKind;
use domus_residency::HandoverDirection;

/// Wraps the directory to model the latency of a remote authentication call.
///
/// Only the demo pays this cost; tests inject the directory directly.
struct RemoteDirectory {
    inner: Arc<AccountDirectory>,
    latency: Duration,
}

#[async_trait]
impl CredentialVerifier for RemoteDirectory {
    async fn verify(&self, email: &str, secret: &str) -> Option<Account> {
        tokio::time::sleep(self.latency).await;
        self.inner.verify(email, secret).await
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    domus_observability::init();

    let directory = seed::demo_directory();
    let verifier = Arc::new(RemoteDirectory {
        inner: directory.clone(),
        latency: Duration::from_millis(250),
    });
    let ctx = AppContext::with_verifier(directory.clone(), verifier);
    let events = ctx.subscribe();

    // Warden session: set up a room, an assignment and an announcement.
    ensure!(
        ctx.session().login(seed::SUB_WARDEN_EMAIL, seed::DEMO_SECRET).await,
        "warden login failed"
    );

    let room_id = ctx.housing().register_room("12", 1, 2)?;
    ctx.housing()
        .add_furniture(room_id, FurnitureKind::Bed, FurnitureCondition::Good, 2, None)?;

    let student = directory
        .find_by_email(seed::STUDENT_EMAIL)
        .context("fixture student missing")?;
    let assignment_id = ctx
        .residency()
        .assign_room(student.id, room_id, "2026/2027")?;
    ctx.residency().record_handover(
        assignment_id,
        HandoverDirection::WardenToStudent,
        Some("move-in".to_string()),
    )?;
    ctx.residency().confirm_handover(assignment_id)?;
    ctx.housing().adjust_occupancy(room_id, 1)?;

    ctx.announcements().publish_announcement(
        "Fire drill",
        "Assembly point is the front lawn, Thursday 09:00.",
        AnnouncementKind::General,
        AnnouncementPriority::Medium,
        None,
        None,
    )?;

    ctx.session().logout();

    // Student session: report a fault, request a room, then try a staff action.
    ensure!(
        ctx.session().login(seed::STUDENT_EMAIL, seed::DEMO_SECRET).await,
        "student login failed"
    );

    ctx.maintenance().submit_report(
        room_id,
        ReportCategory::Electrical,
        "Desk socket dead",
        "The socket next to the desk has stopped working.",
        ReportPriority::Medium,
    )?;
    ctx.requests().submit_request(
        RequestKind::Interview,
        "Quiet room needed for an online interview.",
        vec![room_id],
        Utc::now(),
        1,
    )?;

    // Students cannot confirm key handovers; the denial lands in the feed.
    ensure!(
        ctx.residency().confirm_handover(assignment_id).is_err(),
        "student confirm should have been denied"
    );

    ctx.session().logout();

    let now = Utc::now();
    println!(
        "{} notifications, {} unread",
        ctx.notifications().len(),
        ctx.notifications().unread_count()
    );
    for n in ctx.notifications().notifications() {
        println!("  [{:?}] {} — {} ({})", n.severity, n.title, n.message, n.age(now));
    }

    let mut event_count = 0;
    while events.try_recv().is_ok() {
        event_count += 1;
    }
    println!("{event_count} domain events broadcast");

    Ok(())
}
