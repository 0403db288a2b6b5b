use course_attendance::{AttendanceStatus, CheckIn, Decision};

mod common;

use common::strings;

#[test]
fn get_or_create_roll_seeds_absent_once() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a", "b", "c"]);

    let first = manager.get_or_create_roll(&course, 1, 1, 2).unwrap().unwrap();
    assert_eq!(first.roll_id, "98008_1_1_2");
    assert_eq!(first.absent_students, strings(&["a", "b", "c"]));
    assert!(first.present_students.is_empty());
    assert!(!first.processed);

    let second = manager.get_or_create_roll(&course, 1, 1, 2).unwrap().unwrap();
    assert_eq!(second, first);
}

#[test]
fn existing_roll_is_not_reseeded_from_a_changed_roster() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a", "b"]);
    let roll = manager.get_or_create_roll(&course, 1, 1, 2).unwrap().unwrap();
    manager.check_in(&roll.roll_id, "a").unwrap();

    manager
        .update_roster("98008", &strings(&["a", "b", "c"]))
        .unwrap();
    let course = manager.get_course("98008").unwrap().unwrap();
    let roll = manager.get_or_create_roll(&course, 1, 1, 2).unwrap().unwrap();

    assert_eq!(roll.present_students, strings(&["a"]));
    assert_eq!(roll.absent_students, strings(&["b"]));
    // The view is computed against the current roster instead.
    let view = manager.roll_view(&roll.roll_id).unwrap();
    assert_eq!(view.absent, strings(&["b", "c"]));
}

#[test]
fn distinct_sessions_get_distinct_rolls() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a"]);

    let monday = manager.get_or_create_roll(&course, 1, 1, 2).unwrap().unwrap();
    let wednesday = manager.get_or_create_roll(&course, 1, 3, 2).unwrap().unwrap();
    manager.check_in(&monday.roll_id, "a").unwrap();

    let wednesday = manager.get_roll(&wednesday.roll_id).unwrap().unwrap();
    assert_eq!(wednesday.absent_students, strings(&["a"]));
    assert!(manager.get_roll("98008_9_9_9").unwrap().is_none());
}

#[test]
fn check_in_moves_students_and_is_idempotent() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a", "b", "c"]);
    let roll_id = manager
        .get_or_create_roll(&course, 1, 1, 2)
        .unwrap()
        .unwrap()
        .roll_id;

    assert_eq!(manager.check_in(&roll_id, "a").unwrap(), CheckIn::Present);
    let roll = manager.get_roll(&roll_id).unwrap().unwrap();
    assert_eq!(roll.present_students, strings(&["a"]));
    assert_eq!(roll.absent_students, strings(&["b", "c"]));

    manager.check_in(&roll_id, "b").unwrap();
    manager.check_in(&roll_id, "b").unwrap();
    let roll = manager.get_roll(&roll_id).unwrap().unwrap();
    assert_eq!(roll.present_students, strings(&["a", "b"]));
    assert_eq!(roll.absent_students, strings(&["c"]));
}

#[test]
fn check_in_on_missing_roll_fails() {
    let (_db, mut manager) = common::setup_manager();
    common::seed_course(&mut manager, &["a"]);

    let err = manager.check_in("98008_1_1_2", "a").unwrap_err();
    assert_eq!(err.code(), "ROLL_NOT_FOUND");
}

#[test]
fn approved_leave_blocks_check_in_without_mutation() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a", "b", "c"]);
    let ask = manager.ask_for_leave("98008", "c", 1, 1, 2, "interview").unwrap();
    manager
        .review_leave_request(&ask.request_id, Decision::Approve)
        .unwrap();
    let roll_id = course.roll_key(1, 1, 2).to_string();
    let before = manager.get_roll(&roll_id).unwrap().unwrap();
    assert_eq!(before.asked_students, strings(&["c"]));

    let err = manager.check_in(&roll_id, "c").unwrap_err();

    assert_eq!(err.code(), "ASK_FOR_LEAVE_HAS_BEEN_APPROVED");
    assert_eq!(manager.get_roll(&roll_id).unwrap().unwrap(), before);
}

#[test]
fn disapproved_leave_allows_check_in() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a", "b", "c"]);
    let roll_id = course.roll_key(1, 1, 2).to_string();
    let ask = manager.ask_for_leave("98008", "c", 1, 1, 2, "interview").unwrap();
    manager
        .review_leave_request(&ask.request_id, Decision::Disapprove)
        .unwrap();
    manager.check_in(&roll_id, "a").unwrap();

    let outcome = manager.check_in(&roll_id, "c").unwrap();

    assert_eq!(
        outcome,
        CheckIn::PresentWithdrawingAsk {
            request_id: ask.request_id.clone()
        }
    );
    let roll = manager.get_roll(&roll_id).unwrap().unwrap();
    assert_eq!(roll.present_students, strings(&["a", "c"]));
    assert_eq!(roll.absent_students, strings(&["b"]));
    assert!(roll.asked_students.is_empty());
    assert!(roll.asks.is_empty());
    // The request itself is kept.
    assert!(manager.get_leave_request(&ask.request_id).unwrap().is_some());
}

#[test]
fn pending_leave_is_withdrawn_by_check_in() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a"]);
    let roll_id = course.roll_key(2, 3, 4).to_string();
    manager.ask_for_leave("98008", "a", 2, 3, 4, "bus").unwrap();

    manager.check_in(&roll_id, "a").unwrap();

    assert_eq!(
        manager.attendance_status(&roll_id, "a").unwrap(),
        AttendanceStatus::Present
    );
}

#[test]
fn attendance_status_reports_each_state() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a", "b", "c", "d"]);
    let roll_id = course.roll_key(1, 1, 2).to_string();
    let pending = manager.ask_for_leave("98008", "b", 1, 1, 2, "flight").unwrap();
    let approved = manager.ask_for_leave("98008", "c", 1, 1, 2, "sick").unwrap();
    let rejected = manager.ask_for_leave("98008", "d", 1, 1, 2, "tired").unwrap();
    let approved = manager
        .review_leave_request(&approved.request_id, Decision::Approve)
        .unwrap();
    manager
        .review_leave_request(&rejected.request_id, Decision::Disapprove)
        .unwrap();
    manager.check_in(&roll_id, "a").unwrap();

    assert_eq!(
        manager.attendance_status(&roll_id, "a").unwrap(),
        AttendanceStatus::Present
    );
    assert_eq!(
        manager.attendance_status(&roll_id, "b").unwrap(),
        AttendanceStatus::HasAskedForLeave(pending.view())
    );
    assert_eq!(
        manager.attendance_status(&roll_id, "c").unwrap(),
        AttendanceStatus::HasAskedForLeave(approved.view())
    );
    assert_eq!(
        manager.attendance_status(&roll_id, "d").unwrap(),
        AttendanceStatus::Absent
    );
}

#[test]
fn roll_view_counts_only_approved_students_as_asked() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a", "b", "c", "d"]);
    let roll_id = course.roll_key(1, 1, 2).to_string();
    manager.ask_for_leave("98008", "b", 1, 1, 2, "flight").unwrap();
    let approved = manager.ask_for_leave("98008", "c", 1, 1, 2, "sick").unwrap();
    manager
        .review_leave_request(&approved.request_id, Decision::Approve)
        .unwrap();
    manager.check_in(&roll_id, "a").unwrap();

    let roll = manager.get_roll(&roll_id).unwrap().unwrap();
    let view = manager.roll_view(&roll_id).unwrap();

    assert_eq!(roll.asked_students, strings(&["b", "c"]));
    assert_eq!(view.asked, strings(&["c"]));
    assert_eq!(view.present, strings(&["a"]));
    assert_eq!(view.absent, strings(&["b", "d"]));
}

#[test]
fn mark_processed_flips_once() {
    let (_db, mut manager) = common::setup_manager();
    let course = common::seed_course(&mut manager, &["a"]);
    let roll = manager.get_or_create_roll(&course, 3, 3, 2).unwrap().unwrap();

    assert!(manager.mark_processed(&roll.roll_id).unwrap());
    assert!(!manager.mark_processed(&roll.roll_id).unwrap());
    assert!(manager.get_roll(&roll.roll_id).unwrap().unwrap().processed);

    let err = manager.mark_processed("98008_7_7_7").unwrap_err();
    assert_eq!(err.code(), "ROLL_NOT_FOUND");
}
