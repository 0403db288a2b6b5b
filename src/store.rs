//! Connection-level queries that load and update the aggregate records.
//!
//! Every function here is a single statement or a short fixed sequence of statements; callers
//! wrap multi-step operations in a transaction. List fields are membership tables, so "add to set"
//! is an `INSERT OR IGNORE` against a unique index and "pull" is a `DELETE`.

use crate::course::{CourseSchedule, CourseSettings, SubCourse};
use crate::error::{AttendanceError, Result};
use crate::leave::LeaveRequest;
use crate::models::{
    CourseRow, LeaveStatus, MemberRole, NewCourseClass, NewCourseMember, NewPendingAsk,
    NewRollAsk, NewRollMember, NewSchedule, RollList, RollRow, ScheduleRow,
};
use crate::roll::{AttendanceRoll, CheckIn, RollKey};
use crate::roster::RosterDiff;
use crate::schema::{
    attendance_rolls, course_classes, course_members, course_pending_asks, course_schedules,
    leave_requests, roll_asks, roll_members, sub_courses,
};
use diesel::prelude::*;
use std::collections::HashSet;

impl TryFrom<ScheduleRow> for CourseSchedule {
    type Error = serde_json::Error;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        Ok(CourseSchedule {
            room_name: row.room_name,
            room_id: row.room_id,
            days: serde_json::from_str(&row.days)?,
            period: row.period,
            weeks: serde_json::from_str(&row.weeks)?,
        })
    }
}

/// Inserts a course with its roster, schedule and class groups. `pending_asks` is not stored here:
/// requests join that list when they are filed.
pub fn insert_course(conn: &mut SqliteConnection, course: &SubCourse) -> Result<()> {
    diesel::insert_into(sub_courses::table)
        .values(CourseRow {
            course_id: course.course_id.clone(),
            sub_id: course.sub_id.clone(),
            name: course.name.clone(),
            allow_late: course.settings.allow_late,
        })
        .execute(conn)?;

    add_members(conn, &course.course_id, &course.teachers, MemberRole::Teacher)?;
    add_members(conn, &course.course_id, &course.students, MemberRole::Student)?;

    let schedules = course
        .schedules
        .iter()
        .map(|schedule| {
            Ok::<_, AttendanceError>(NewSchedule {
                course_id: &course.course_id,
                room_id: &schedule.room_id,
                room_name: &schedule.room_name,
                days: serde_json::to_string(&schedule.days)?,
                period: schedule.period,
                weeks: serde_json::to_string(&schedule.weeks)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if !schedules.is_empty() {
        diesel::insert_into(course_schedules::table)
            .values(&schedules)
            .execute(conn)?;
    }

    let classes: Vec<NewCourseClass> = course
        .classes
        .iter()
        .map(|class_id| NewCourseClass {
            course_id: &course.course_id,
            class_id: class_id.as_str(),
        })
        .collect();
    if !classes.is_empty() {
        diesel::insert_or_ignore_into(course_classes::table)
            .values(&classes)
            .execute(conn)?;
    }

    Ok(())
}

pub fn find_course(conn: &mut SqliteConnection, course_id: &str) -> Result<Option<SubCourse>> {
    let Some(row) = sub_courses::table
        .find(course_id)
        .select(CourseRow::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let members: Vec<(String, MemberRole)> = course_members::table
        .filter(course_members::course_id.eq(course_id))
        .order(course_members::id)
        .select((course_members::member_id, course_members::role))
        .load(conn)?;

    let mut teachers = Vec::new();
    let mut students = Vec::new();
    for (member_id, role) in members {
        match role {
            MemberRole::Teacher => teachers.push(member_id),
            MemberRole::Student => students.push(member_id),
        }
    }

    let schedules = course_schedules::table
        .filter(course_schedules::course_id.eq(course_id))
        .order(course_schedules::id)
        .select(ScheduleRow::as_select())
        .load::<ScheduleRow>(conn)?
        .into_iter()
        .map(CourseSchedule::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let classes = course_classes::table
        .filter(course_classes::course_id.eq(course_id))
        .order(course_classes::id)
        .select(course_classes::class_id)
        .load(conn)?;

    let pending_asks = course_pending_asks::table
        .filter(course_pending_asks::course_id.eq(course_id))
        .order(course_pending_asks::id)
        .select(course_pending_asks::request_id)
        .load(conn)?;

    Ok(Some(SubCourse {
        course_id: row.course_id,
        sub_id: row.sub_id,
        name: row.name,
        teachers,
        students,
        schedules,
        settings: CourseSettings {
            allow_late: row.allow_late,
        },
        classes,
        pending_asks,
    }))
}

pub fn course_ids(conn: &mut SqliteConnection) -> QueryResult<Vec<String>> {
    sub_courses::table
        .order(sub_courses::course_id)
        .select(sub_courses::course_id)
        .load(conn)
}

fn add_members(
    conn: &mut SqliteConnection,
    course_id: &str,
    member_ids: &[String],
    role: MemberRole,
) -> QueryResult<usize> {
    if member_ids.is_empty() {
        return Ok(0);
    }

    let rows: Vec<NewCourseMember> = member_ids
        .iter()
        .map(|member_id| NewCourseMember {
            course_id,
            member_id: member_id.as_str(),
            role,
        })
        .collect();

    diesel::insert_or_ignore_into(course_members::table)
        .values(&rows)
        .execute(conn)
}

/// Replaces the course's students with `students`, keeping the position of students who stay.
pub fn replace_students(
    conn: &mut SqliteConnection,
    course_id: &str,
    students: &[String],
) -> QueryResult<RosterDiff> {
    let current: Vec<String> = course_members::table
        .filter(course_members::course_id.eq(course_id))
        .filter(course_members::role.eq(MemberRole::Student))
        .order(course_members::id)
        .select(course_members::member_id)
        .load(conn)?;

    let incoming: HashSet<&str> = students.iter().map(String::as_str).collect();
    let dropped: Vec<String> = current
        .iter()
        .filter(|student| !incoming.contains(student.as_str()))
        .cloned()
        .collect();

    let mut seen: HashSet<&str> = current.iter().map(String::as_str).collect();
    let added: Vec<String> = students
        .iter()
        .filter(|student| seen.insert(student.as_str()))
        .cloned()
        .collect();

    if !dropped.is_empty() {
        diesel::delete(
            course_members::table
                .filter(course_members::course_id.eq(course_id))
                .filter(course_members::role.eq(MemberRole::Student))
                .filter(course_members::member_id.eq_any(&dropped)),
        )
        .execute(conn)?;
    }
    add_members(conn, course_id, &added, MemberRole::Student)?;

    Ok(RosterDiff { added, dropped })
}

/// Inserts the roll unless one with the same ID exists, seeding its absent list on creation.
///
/// Returns whether the roll was created by this call.
pub fn create_roll(conn: &mut SqliteConnection, roll: &AttendanceRoll) -> QueryResult<bool> {
    let inserted = diesel::insert_or_ignore_into(attendance_rolls::table)
        .values(RollRow {
            roll_id: roll.roll_id.clone(),
            course_id: roll.course_id.clone(),
            week: roll.week,
            day: roll.day,
            period: roll.period,
            processed: roll.processed,
        })
        .execute(conn)?;

    if inserted == 0 {
        return Ok(false);
    }

    for student_id in &roll.absent_students {
        add_to_list(conn, &roll.roll_id, RollList::Absent, student_id)?;
    }

    Ok(true)
}

pub fn find_roll(conn: &mut SqliteConnection, roll_id: &str) -> QueryResult<Option<AttendanceRoll>> {
    let Some(row) = attendance_rolls::table
        .find(roll_id)
        .select(RollRow::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let members: Vec<(String, RollList)> = roll_members::table
        .filter(roll_members::roll_id.eq(roll_id))
        .order(roll_members::id)
        .select((roll_members::student_id, roll_members::list))
        .load(conn)?;

    let mut present_students = Vec::new();
    let mut absent_students = Vec::new();
    let mut asked_students = Vec::new();
    for (student_id, list) in members {
        match list {
            RollList::Present => present_students.push(student_id),
            RollList::Absent => absent_students.push(student_id),
            RollList::Asked => asked_students.push(student_id),
        }
    }

    let asks = roll_asks::table
        .filter(roll_asks::roll_id.eq(roll_id))
        .order(roll_asks::id)
        .select(roll_asks::request_id)
        .load(conn)?;

    Ok(Some(AttendanceRoll {
        roll_id: row.roll_id,
        course_id: row.course_id,
        week: row.week,
        day: row.day,
        period: row.period,
        present_students,
        absent_students,
        asked_students,
        asks,
        processed: row.processed,
    }))
}

pub fn add_to_list(
    conn: &mut SqliteConnection,
    roll_id: &str,
    list: RollList,
    student_id: &str,
) -> QueryResult<usize> {
    diesel::insert_or_ignore_into(roll_members::table)
        .values(NewRollMember {
            roll_id,
            student_id,
            list,
        })
        .execute(conn)
}

pub fn pull_from_list(
    conn: &mut SqliteConnection,
    roll_id: &str,
    list: RollList,
    student_id: &str,
) -> QueryResult<usize> {
    diesel::delete(
        roll_members::table
            .filter(roll_members::roll_id.eq(roll_id))
            .filter(roll_members::list.eq(list))
            .filter(roll_members::student_id.eq(student_id)),
    )
    .execute(conn)
}

/// Writes an accepted check-in, mirroring [`AttendanceRoll::apply_check_in`].
pub fn apply_check_in(
    conn: &mut SqliteConnection,
    roll_id: &str,
    student_id: &str,
    check_in: &CheckIn,
) -> QueryResult<()> {
    add_to_list(conn, roll_id, RollList::Present, student_id)?;
    pull_from_list(conn, roll_id, RollList::Absent, student_id)?;

    match check_in {
        CheckIn::Present => {}
        CheckIn::PresentDroppingAsked => {
            pull_from_list(conn, roll_id, RollList::Asked, student_id)?;
        }
        CheckIn::PresentWithdrawingAsk { request_id } => {
            pull_from_list(conn, roll_id, RollList::Asked, student_id)?;
            diesel::delete(
                roll_asks::table
                    .filter(roll_asks::roll_id.eq(roll_id))
                    .filter(roll_asks::request_id.eq(request_id)),
            )
            .execute(conn)?;
        }
    }

    Ok(())
}

pub fn mark_processed(conn: &mut SqliteConnection, roll_id: &str) -> QueryResult<bool> {
    diesel::update(
        attendance_rolls::table
            .filter(attendance_rolls::roll_id.eq(roll_id))
            .filter(attendance_rolls::processed.eq(false)),
    )
    .set(attendance_rolls::processed.eq(true))
    .execute(conn)
    .map(|updated| updated == 1)
}

/// Stores a new request and files it against its roll and its course's pending list.
pub fn insert_leave_request(conn: &mut SqliteConnection, ask: &LeaveRequest) -> QueryResult<()> {
    let roll_id = RollKey::new(&ask.course_id, ask.week, ask.day, ask.period).to_string();

    diesel::insert_into(leave_requests::table)
        .values(ask)
        .execute(conn)?;
    diesel::insert_or_ignore_into(roll_asks::table)
        .values(NewRollAsk {
            roll_id: &roll_id,
            request_id: &ask.request_id,
        })
        .execute(conn)?;
    add_to_list(conn, &roll_id, RollList::Asked, &ask.student_id)?;
    diesel::insert_or_ignore_into(course_pending_asks::table)
        .values(NewPendingAsk {
            course_id: &ask.course_id,
            request_id: &ask.request_id,
        })
        .execute(conn)?;

    Ok(())
}

pub fn find_leave_request(
    conn: &mut SqliteConnection,
    request_id: &str,
) -> QueryResult<Option<LeaveRequest>> {
    leave_requests::table
        .find(request_id)
        .select(LeaveRequest::as_select())
        .first(conn)
        .optional()
}

/// Persists a review and takes the request off its course's pending list.
///
/// Only a request still pending in the database is updated; returns whether it was.
pub fn save_review(conn: &mut SqliteConnection, ask: &LeaveRequest) -> QueryResult<bool> {
    let updated = diesel::update(
        leave_requests::table
            .filter(leave_requests::request_id.eq(&ask.request_id))
            .filter(leave_requests::status.eq(LeaveStatus::Pending)),
    )
    .set((
        leave_requests::status.eq(ask.status),
        leave_requests::viewed_at.eq(ask.viewed_at),
    ))
    .execute(conn)?;

    diesel::delete(
        course_pending_asks::table
            .filter(course_pending_asks::course_id.eq(&ask.course_id))
            .filter(course_pending_asks::request_id.eq(&ask.request_id)),
    )
    .execute(conn)?;

    Ok(updated == 1)
}

/// The requests linked to a roll, oldest link first.
pub fn roll_leave_requests(
    conn: &mut SqliteConnection,
    roll_id: &str,
) -> QueryResult<Vec<LeaveRequest>> {
    roll_asks::table
        .inner_join(leave_requests::table)
        .filter(roll_asks::roll_id.eq(roll_id))
        .order(roll_asks::id)
        .select(LeaveRequest::as_select())
        .load(conn)
}

pub fn pending_leave_requests(
    conn: &mut SqliteConnection,
    course_id: &str,
) -> QueryResult<Vec<LeaveRequest>> {
    course_pending_asks::table
        .inner_join(leave_requests::table)
        .filter(course_pending_asks::course_id.eq(course_id))
        .order(course_pending_asks::id)
        .select(LeaveRequest::as_select())
        .load(conn)
}

pub fn student_leave_requests(
    conn: &mut SqliteConnection,
    student_id: &str,
) -> QueryResult<Vec<LeaveRequest>> {
    leave_requests::table
        .filter(leave_requests::student_id.eq(student_id))
        .order(leave_requests::created_at)
        .select(LeaveRequest::as_select())
        .load(conn)
}
