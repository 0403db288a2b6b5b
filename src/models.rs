//! Row types and column enums for the tables in [`crate::schema`].
//!
//! These mirror the database layout one-to-one. The aggregate records callers work with
//! ([`SubCourse`](crate::course::SubCourse), [`AttendanceRoll`](crate::roll::AttendanceRoll)) are
//! assembled from several of these rows by [`crate::store`].

use crate::schema::{
    attendance_rolls, course_classes, course_members, course_pending_asks, course_schedules,
    roll_asks, roll_members, sub_courses,
};
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::{Integer, Text};
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The review state of a leave request, stored as `0`, `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Integer)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending = 0,
    Approved = 1,
    Disapproved = 2,
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Disapproved => "DISAPPROVED",
        };
        f.write_str(name)
    }
}

impl ToSql<Integer, Sqlite> for LeaveStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(*self as i32);
        Ok(IsNull::No)
    }
}

impl FromSql<Integer, Sqlite> for LeaveStatus {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        match <i32 as FromSql<Integer, Sqlite>>::from_sql(bytes)? {
            0 => Ok(LeaveStatus::Pending),
            1 => Ok(LeaveStatus::Approved),
            2 => Ok(LeaveStatus::Disapproved),
            other => Err(format!("unrecognized leave status {other}").into()),
        }
    }
}

/// Whether a course member teaches or attends the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum MemberRole {
    Teacher,
    Student,
}

impl ToSql<Text, Sqlite> for MemberRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(match self {
            MemberRole::Teacher => "teacher",
            MemberRole::Student => "student",
        });
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for MemberRole {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        match <String as FromSql<Text, Sqlite>>::from_sql(bytes)?.as_str() {
            "teacher" => Ok(MemberRole::Teacher),
            "student" => Ok(MemberRole::Student),
            other => Err(format!("unrecognized member role {other}").into()),
        }
    }
}

/// Which of the three student lists of a roll a `roll_members` row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum RollList {
    Present,
    Absent,
    Asked,
}

impl ToSql<Text, Sqlite> for RollList {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(match self {
            RollList::Present => "present",
            RollList::Absent => "absent",
            RollList::Asked => "asked",
        });
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for RollList {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        match <String as FromSql<Text, Sqlite>>::from_sql(bytes)?.as_str() {
            "present" => Ok(RollList::Present),
            "absent" => Ok(RollList::Absent),
            "asked" => Ok(RollList::Asked),
            other => Err(format!("unrecognized roll list {other}").into()),
        }
    }
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = sub_courses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CourseRow {
    pub course_id: String,
    pub sub_id: String,
    pub name: String,
    pub allow_late: Option<i32>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = course_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ScheduleRow {
    pub id: i32,
    pub course_id: String,
    pub room_id: String,
    pub room_name: String,
    /// JSON array of weekday numbers.
    pub days: String,
    pub period: i32,
    /// JSON array of week numbers.
    pub weeks: String,
}

#[derive(Insertable)]
#[diesel(table_name = course_schedules)]
pub struct NewSchedule<'a> {
    pub course_id: &'a str,
    pub room_id: &'a str,
    pub room_name: &'a str,
    pub days: String,
    pub period: i32,
    pub weeks: String,
}

#[derive(Insertable)]
#[diesel(table_name = course_members)]
pub struct NewCourseMember<'a> {
    pub course_id: &'a str,
    pub member_id: &'a str,
    pub role: MemberRole,
}

#[derive(Insertable)]
#[diesel(table_name = course_classes)]
pub struct NewCourseClass<'a> {
    pub course_id: &'a str,
    pub class_id: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = course_pending_asks)]
pub struct NewPendingAsk<'a> {
    pub course_id: &'a str,
    pub request_id: &'a str,
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = attendance_rolls)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RollRow {
    pub roll_id: String,
    pub course_id: String,
    pub week: i32,
    pub day: i32,
    pub period: i32,
    pub processed: bool,
}

#[derive(Insertable)]
#[diesel(table_name = roll_members)]
pub struct NewRollMember<'a> {
    pub roll_id: &'a str,
    pub student_id: &'a str,
    pub list: RollList,
}

#[derive(Insertable)]
#[diesel(table_name = roll_asks)]
pub struct NewRollAsk<'a> {
    pub roll_id: &'a str,
    pub request_id: &'a str,
}
