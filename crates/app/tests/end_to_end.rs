//! Black-box scenario tests against the full application context.

use domus_app::{AppContext, seed};
use domus_core::DomainError;
use domus_events::DomainEvent;
use domus_housing::{FurnitureCondition, FurnitureKind, RoomStatus};
use domus_maintenance::{ReportCategory, ReportPriority, ReportStatus};
use domus_notify::Severity;
use domus_requests::{RequestKind, RequestStatus};
use domus_residency::{HandoverDirection, KeyStatus};

async fn staff_context() -> AppContext {
    let ctx = AppContext::new(seed::demo_directory());
    assert!(
        ctx.session()
            .login(seed::SUB_WARDEN_EMAIL, seed::DEMO_SECRET)
            .await
    );
    ctx
}

#[tokio::test]
async fn staff_action_succeeds_then_student_is_denied_without_mutation() {
    let directory = seed::demo_directory();
    let ctx = AppContext::new(directory.clone());

    // Staff supervisor: the gated action succeeds with a success notification.
    assert!(
        ctx.session()
            .login(seed::SUB_WARDEN_EMAIL, seed::DEMO_SECRET)
            .await
    );

    let room_id = ctx.housing().register_room("12", 1, 2).unwrap();
    let student = directory.find_by_email(seed::STUDENT_EMAIL).unwrap();
    let assignment_id = ctx
        .residency()
        .assign_room(student.id, room_id, "2026/2027")
        .unwrap();
    ctx.residency()
        .record_handover(assignment_id, HandoverDirection::WardenToStudent, None)
        .unwrap();
    ctx.residency().confirm_handover(assignment_id).unwrap();

    let feed = ctx.notifications().notifications();
    assert_eq!(feed[0].title, "Key Handover Confirmed");
    assert_eq!(feed[0].severity, Severity::Success);
    assert!(feed[0].message.contains("John Doe"));
    assert!(feed[0].message.contains("12"));
    assert_eq!(
        ctx.residency().assignment(assignment_id).unwrap().key_status(),
        KeyStatus::WithStudent
    );

    // Standard occupant: the same action is rejected, reported, and changes
    // nothing.
    ctx.session().logout();
    assert!(
        ctx.session()
            .login(seed::STUDENT_EMAIL, seed::DEMO_SECRET)
            .await
    );

    let before = ctx.residency().assignment(assignment_id).unwrap();
    let err = ctx.residency().confirm_handover(assignment_id).unwrap_err();
    assert_eq!(err, DomainError::Unauthorized);
    assert_eq!(ctx.residency().assignment(assignment_id).unwrap(), before);

    let feed = ctx.notifications().notifications();
    assert_eq!(feed[0].title, "Permission Denied");
    assert_eq!(feed[0].severity, Severity::Error);
    assert_eq!(feed[0].message, "Only wardens can confirm key handovers.");
}

#[tokio::test]
async fn anonymous_actions_are_denied() {
    let ctx = AppContext::new(seed::demo_directory());

    let err = ctx
        .requests()
        .submit_request(RequestKind::Temporary, "Exam week", Vec::new(), chrono::Utc::now(), 3)
        .unwrap_err();
    assert_eq!(err, DomainError::Unauthorized);
    assert!(ctx.requests().requests().is_empty());

    let feed = ctx.notifications().notifications();
    assert_eq!(feed[0].title, "Permission Denied");
}

#[tokio::test]
async fn validation_failure_is_reported_before_any_mutation() {
    let ctx = staff_context().await;

    let err = ctx.housing().register_room("  ", 1, 2).unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert!(ctx.housing().rooms().is_empty());

    let feed = ctx.notifications().notifications();
    assert_eq!(feed[0].title, "Validation Error");
    assert_eq!(feed[0].severity, Severity::Error);
}

#[tokio::test]
async fn request_review_flow_notifies_with_the_student_and_kind() {
    let directory = seed::demo_directory();
    let ctx = AppContext::new(directory.clone());

    assert!(
        ctx.session()
            .login(seed::STUDENT_EMAIL, seed::DEMO_SECRET)
            .await
    );
    let request_id = ctx
        .requests()
        .submit_request(
            RequestKind::Medical,
            "Ground-floor room needed after surgery.",
            Vec::new(),
            chrono::Utc::now(),
            14,
        )
        .unwrap();

    ctx.session().logout();
    assert!(
        ctx.session()
            .login(seed::WELFARE_OFFICER_EMAIL, seed::DEMO_SECRET)
            .await
    );
    ctx.requests().approve_request(request_id, None).unwrap();

    assert_eq!(
        ctx.requests().request(request_id).unwrap().status(),
        RequestStatus::Approved
    );
    let feed = ctx.notifications().notifications();
    assert_eq!(feed[0].title, "Request Approved");
    assert_eq!(feed[0].message, "John Doe's medical request has been approved.");

    // A second decision on the same request is a conflict, reported as a
    // warning, and the approval stands.
    let err = ctx.requests().deny_request(request_id, None).unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    let feed = ctx.notifications().notifications();
    assert_eq!(feed[0].title, "Action Not Allowed");
    assert_eq!(feed[0].severity, Severity::Warning);
    assert_eq!(
        ctx.requests().request(request_id).unwrap().status(),
        RequestStatus::Approved
    );
}

#[tokio::test]
async fn maintenance_flow_and_inventory_gating() {
    let ctx = staff_context().await;

    let room_id = ctx.housing().register_room("7", 2, 1).unwrap();
    ctx.housing()
        .add_furniture(room_id, FurnitureKind::Desk, FurnitureCondition::Good, 1, None)
        .unwrap();
    assert_eq!(ctx.housing().furniture_inventory(room_id).unwrap().len(), 1);

    let report_id = ctx
        .maintenance()
        .submit_report(
            room_id,
            ReportCategory::Furniture,
            "Wobbly desk",
            "The desk leg is loose.",
            ReportPriority::Low,
        )
        .unwrap();
    ctx.maintenance().start_progress(report_id).unwrap();
    ctx.maintenance().resolve_report(report_id).unwrap();
    assert_eq!(
        ctx.maintenance().report(report_id).unwrap().status(),
        ReportStatus::Resolved
    );

    // Students may submit reports but may not view inventories.
    ctx.session().logout();
    assert!(
        ctx.session()
            .login(seed::STUDENT_EMAIL, seed::DEMO_SECRET)
            .await
    );
    ctx.maintenance()
        .submit_report(
            room_id,
            ReportCategory::Cleanliness,
            "Corridor bins",
            "Bins on floor 2 have not been emptied.",
            ReportPriority::Low,
        )
        .unwrap();
    let err = ctx.housing().furniture_inventory(room_id).unwrap_err();
    assert_eq!(err, DomainError::Unauthorized);
    assert_eq!(
        ctx.notifications().notifications()[0].message,
        "Only wardens can view room inventories."
    );
}

#[tokio::test]
async fn services_broadcast_domain_events_in_order() {
    let ctx = staff_context().await;
    let events = ctx.subscribe();

    let room_id = ctx.housing().register_room("3", 1, 2).unwrap();
    ctx.housing()
        .change_status(room_id, RoomStatus::Maintenance)
        .unwrap();

    assert_eq!(
        events.try_recv().unwrap().event_type(),
        "housing.room.registered"
    );
    assert_eq!(
        events.try_recv().unwrap().event_type(),
        "housing.room.status_changed"
    );
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn the_feed_stays_newest_first_with_a_consistent_badge() {
    let ctx = staff_context().await;

    ctx.housing().register_room("1", 1, 2).unwrap();
    ctx.housing().register_room("2", 1, 2).unwrap();
    let denied = ctx.housing().register_room("2", 1, 0).unwrap_err();
    assert!(matches!(denied, DomainError::Validation(_)));

    let feed = ctx.notifications().notifications();
    let titles: Vec<_> = feed.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, ["Validation Error", "Room Added", "Room Added"]);
    assert_eq!(ctx.notifications().unread_count(), 3);

    ctx.notifications().mark_all_as_read();
    assert_eq!(ctx.notifications().unread_count(), 0);
}
