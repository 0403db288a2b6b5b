//! Per-session attendance rolls.
//!
//! A roll is keyed by `(course, week, day, period)` and records which students checked in, which
//! are still absent, and which asked for leave. Rolls refer to leave requests by ID only; the
//! methods here that need the requests themselves take them as a slice, and ignore any request the
//! roll does not link to.

use crate::course::SubCourse;
use crate::error::{AttendanceError, Result};
use crate::leave::{LeaveRequest, LeaveRequestView};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Identifies a single course session. Its [`Display`](fmt::Display) form is the roll ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RollKey {
    pub course_id: String,
    pub week: i32,
    pub day: i32,
    pub period: i32,
}

impl RollKey {
    pub fn new(course_id: &str, week: i32, day: i32, period: i32) -> Self {
        Self {
            course_id: course_id.to_string(),
            week,
            day,
            period,
        }
    }
}

impl fmt::Display for RollKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.course_id, self.week, self.day, self.period
        )
    }
}

impl FromStr for RollKey {
    type Err = AttendanceError;

    /// Parses a roll ID. Course IDs may contain `_`, so the numeric fields are split off the end.
    fn from_str(roll_id: &str) -> Result<Self> {
        let invalid = || AttendanceError::InvalidRollId(roll_id.to_string());

        let mut parts = roll_id.rsplitn(4, '_');
        let period = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let day = parts.next().and_then(|d| d.parse().ok()).ok_or_else(invalid)?;
        let week = parts.next().and_then(|w| w.parse().ok()).ok_or_else(invalid)?;
        let course_id = parts.next().filter(|c| !c.is_empty()).ok_or_else(invalid)?;

        Ok(Self::new(course_id, week, day, period))
    }
}

/// What a check-in does to the roll once it has been accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIn {
    /// The student never asked for leave: mark present, drop from absent.
    Present,
    /// The student is listed as asked but no linked request exists: also drop from asked.
    PresentDroppingAsked,
    /// The student's request was not approved: also drop from asked and unlink the request.
    PresentWithdrawingAsk { request_id: String },
}

/// How a single student stands on a roll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "ask_for_leave", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Absent,
    Present,
    HasAskedForLeave(LeaveRequestView),
}

/// The attendance record for one course session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRoll {
    pub roll_id: String,
    pub course_id: String,
    pub week: i32,
    pub day: i32,
    pub period: i32,
    pub present_students: Vec<String>,
    pub absent_students: Vec<String>,
    /// Students who asked for leave, whatever the state of their request.
    pub asked_students: Vec<String>,
    /// IDs of the leave requests filed against this session.
    pub asks: Vec<String>,
    pub processed: bool,
}

/// The display record of a roll: who is absent, excused, and present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollView {
    pub absent: Vec<String>,
    pub asked: Vec<String>,
    pub present: Vec<String>,
}

fn add_to_set(list: &mut Vec<String>, student_id: &str) {
    if !list.iter().any(|s| s == student_id) {
        list.push(student_id.to_string());
    }
}

fn pull(list: &mut Vec<String>, id: &str) {
    list.retain(|s| s != id);
}

impl AttendanceRoll {
    /// A fresh roll in which every student on `roster` is absent.
    pub fn new(key: &RollKey, roster: &[String]) -> Self {
        let mut absent_students = Vec::with_capacity(roster.len());
        for student_id in roster {
            add_to_set(&mut absent_students, student_id);
        }

        Self {
            roll_id: key.to_string(),
            course_id: key.course_id.clone(),
            week: key.week,
            day: key.day,
            period: key.period,
            present_students: Vec::new(),
            absent_students,
            asked_students: Vec::new(),
            asks: Vec::new(),
            processed: false,
        }
    }

    pub fn key(&self) -> RollKey {
        RollKey::new(&self.course_id, self.week, self.day, self.period)
    }

    fn linked<'a>(&'a self, asks: &'a [LeaveRequest]) -> impl Iterator<Item = &'a LeaveRequest> {
        asks.iter()
            .filter(move |ask| self.asks.iter().any(|id| id == &ask.request_id))
    }

    /// Decides what checking `student_id` in does, without changing the roll.
    ///
    /// Fails with [`AttendanceError::AskForLeaveHasBeenApproved`] if the student's leave was
    /// already approved. When a student has several linked requests the last one decides.
    pub fn resolve_check_in(&self, student_id: &str, asks: &[LeaveRequest]) -> Result<CheckIn> {
        if !self.asked_students.iter().any(|s| s == student_id) {
            return Ok(CheckIn::Present);
        }

        match self.linked(asks).filter(|ask| ask.student_id == student_id).last() {
            None => Ok(CheckIn::PresentDroppingAsked),
            Some(ask) if ask.is_approved() => Err(AttendanceError::AskForLeaveHasBeenApproved {
                student_id: student_id.to_string(),
            }),
            Some(ask) => Ok(CheckIn::PresentWithdrawingAsk {
                request_id: ask.request_id.clone(),
            }),
        }
    }

    /// Applies an accepted check-in. Every step is a set operation, so applying twice is harmless.
    pub fn apply_check_in(&mut self, student_id: &str, check_in: &CheckIn) {
        add_to_set(&mut self.present_students, student_id);
        pull(&mut self.absent_students, student_id);

        match check_in {
            CheckIn::Present => {}
            CheckIn::PresentDroppingAsked => pull(&mut self.asked_students, student_id),
            CheckIn::PresentWithdrawingAsk { request_id } => {
                pull(&mut self.asked_students, student_id);
                pull(&mut self.asks, request_id);
            }
        }
    }

    /// Checks `student_id` in, rejecting students whose leave was approved.
    pub fn check_in(&mut self, student_id: &str, asks: &[LeaveRequest]) -> Result<CheckIn> {
        let check_in = self.resolve_check_in(student_id, asks)?;
        self.apply_check_in(student_id, &check_in);
        Ok(check_in)
    }

    /// Links a new leave request and lists its student as asked.
    pub fn link_ask(&mut self, ask: &LeaveRequest) {
        add_to_set(&mut self.asks, &ask.request_id);
        add_to_set(&mut self.asked_students, &ask.student_id);
    }

    /// A linked request that is approved or pending wins over the check-in lists; a disapproved one
    /// means the student is absent.
    pub fn attendance_status(&self, student_id: &str, asks: &[LeaveRequest]) -> AttendanceStatus {
        if let Some(ask) = self.linked(asks).find(|ask| ask.student_id == student_id) {
            return if ask.is_disapproved() {
                AttendanceStatus::Absent
            } else {
                AttendanceStatus::HasAskedForLeave(ask.view())
            };
        }

        if self.present_students.iter().any(|s| s == student_id) {
            AttendanceStatus::Present
        } else {
            AttendanceStatus::Absent
        }
    }

    /// Builds the roll's display record against the course's current roster.
    ///
    /// Only students with an approved request count as asked here, even though `asked_students`
    /// also holds students whose request is pending or disapproved. Those students show up as
    /// absent until they check in.
    pub fn view(&self, course: &SubCourse, asks: &[LeaveRequest]) -> RollView {
        let mut asked = Vec::new();
        for ask in self.linked(asks).filter(|ask| ask.is_approved()) {
            add_to_set(&mut asked, &ask.student_id);
        }

        let present: HashSet<&str> = self.present_students.iter().map(String::as_str).collect();
        let excused: HashSet<&str> = asked.iter().map(String::as_str).collect();
        let mut absent = Vec::new();
        for student_id in &course.students {
            if !present.contains(student_id.as_str()) && !excused.contains(student_id.as_str()) {
                add_to_set(&mut absent, student_id);
            }
        }

        RollView {
            absent,
            asked,
            present: self.present_students.clone(),
        }
    }
}
