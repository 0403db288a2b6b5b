use course_attendance::{Decision, LeaveStatus};

mod common;

use common::strings;

#[test]
fn ask_for_leave_files_against_roll_and_course() {
    let (_db, mut manager) = common::setup_manager();
    common::seed_course(&mut manager, &["a", "b"]);

    let ask = manager.ask_for_leave("98008", "b", 2, 3, 4, "dentist").unwrap();

    assert_eq!(ask.status, LeaveStatus::Pending);
    assert_eq!(ask.viewed_at, None);
    assert_eq!(
        manager.get_leave_request(&ask.request_id).unwrap(),
        Some(ask.clone())
    );

    let roll = manager.get_roll("98008_2_3_4").unwrap().unwrap();
    assert_eq!(roll.absent_students, strings(&["a", "b"]));
    assert_eq!(roll.asked_students, strings(&["b"]));
    assert_eq!(roll.asks, vec![ask.request_id.clone()]);

    let course = manager.get_course("98008").unwrap().unwrap();
    assert_eq!(course.pending_asks, vec![ask.request_id.clone()]);
    let pending = manager.pending_leave_requests("98008").unwrap();
    let view = course.full_view(&pending);
    assert_eq!(view.pending_asks, vec![ask.view()]);
}

#[test]
fn ask_for_leave_requires_enrollment_and_session() {
    let (_db, mut manager) = common::setup_manager();
    common::seed_course(&mut manager, &["a"]);

    let err = manager
        .ask_for_leave("98008", "stranger", 1, 1, 2, "lost")
        .unwrap_err();
    assert_eq!(err.code(), "NOT_ENROLLED");

    let err = manager.ask_for_leave("98008", "a", 4, 1, 2, "late").unwrap_err();
    assert_eq!(err.code(), "NO_SUCH_SESSION");

    let err = manager.ask_for_leave("nope", "a", 1, 1, 2, "late").unwrap_err();
    assert_eq!(err.code(), "COURSE_NOT_FOUND");

    // Rejected requests leave no roll behind.
    assert!(manager.get_roll("98008_4_1_2").unwrap().is_none());
    assert!(manager.leave_requests_for_student("a").unwrap().is_empty());
}

#[test]
fn second_request_for_the_same_session_is_rejected() {
    let (_db, mut manager) = common::setup_manager();
    common::seed_course(&mut manager, &["a"]);
    manager.ask_for_leave("98008", "a", 1, 1, 2, "sick").unwrap();

    let err = manager.ask_for_leave("98008", "a", 1, 1, 2, "still sick").unwrap_err();
    assert_eq!(err.code(), "ASK_FOR_LEAVE_ALREADY_EXISTS");

    // Other sessions are unaffected.
    manager.ask_for_leave("98008", "a", 1, 3, 2, "still sick").unwrap();
    assert_eq!(manager.leave_requests_for_student("a").unwrap().len(), 2);
}

#[test]
fn approval_is_stamped_and_final() {
    let (_db, mut manager) = common::setup_manager();
    common::seed_course(&mut manager, &["a"]);
    let ask = manager.ask_for_leave("98008", "a", 1, 1, 2, "sick").unwrap();

    let approved = manager
        .review_leave_request(&ask.request_id, Decision::Approve)
        .unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert!(approved.viewed_at.is_some());

    let err = manager
        .review_leave_request(&ask.request_id, Decision::Disapprove)
        .unwrap_err();
    assert_eq!(err.code(), "ASK_FOR_LEAVE_ALREADY_DECIDED");

    let stored = manager.get_leave_request(&ask.request_id).unwrap().unwrap();
    assert_eq!(stored, approved);
    assert!(stored.view().viewed_at.is_some());
}

#[test]
fn review_takes_request_off_pending_list() {
    let (_db, mut manager) = common::setup_manager();
    common::seed_course(&mut manager, &["a", "b"]);
    let first = manager.ask_for_leave("98008", "a", 1, 1, 2, "sick").unwrap();
    let second = manager.ask_for_leave("98008", "b", 1, 1, 2, "sick").unwrap();

    manager
        .review_leave_request(&first.request_id, Decision::Disapprove)
        .unwrap();

    let course = manager.get_course("98008").unwrap().unwrap();
    assert_eq!(course.pending_asks, vec![second.request_id.clone()]);
    let pending = manager.pending_leave_requests("98008").unwrap();
    assert_eq!(pending, vec![second]);
}

#[test]
fn reviewing_unknown_request_fails() {
    let (_db, mut manager) = common::setup_manager();
    let err = manager
        .review_leave_request("no-such-request", Decision::Approve)
        .unwrap_err();
    assert_eq!(err.code(), "ASK_FOR_LEAVE_NOT_FOUND");
}
