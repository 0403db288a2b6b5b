//! Leave requests and their review state machine.
//!
//! A request starts out [`LeaveStatus::Pending`] and is reviewed exactly once:
//!
//! ```text
//! PENDING --approve-->    APPROVED
//! PENDING --disapprove--> DISAPPROVED
//! ```

use crate::error::{AttendanceError, Result};
use crate::models::LeaveStatus;
use crate::roll::RollKey;
use crate::schema::leave_requests;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A student's request to be excused from a single session.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable)]
#[diesel(table_name = leave_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LeaveRequest {
    pub request_id: String,
    pub student_id: String,
    pub reason: String,
    pub status: LeaveStatus,
    pub course_id: String,
    pub week: i32,
    pub day: i32,
    pub period: i32,
    pub created_at: NaiveDateTime,
    /// When the request was reviewed. `None` while the request is pending.
    pub viewed_at: Option<NaiveDateTime>,
}

/// A reviewer's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Disapprove,
}

impl Decision {
    pub fn status(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Disapprove => LeaveStatus::Disapproved,
        }
    }
}

impl LeaveRequest {
    /// Creates a new pending request for the session identified by `key`.
    pub fn new(key: &RollKey, student_id: &str, reason: &str, now: NaiveDateTime) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            reason: reason.to_string(),
            status: LeaveStatus::Pending,
            course_id: key.course_id.clone(),
            week: key.week,
            day: key.day,
            period: key.period,
            created_at: now,
            viewed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == LeaveStatus::Pending
    }

    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }

    pub fn is_disapproved(&self) -> bool {
        self.status == LeaveStatus::Disapproved
    }

    /// Moves a pending request to the status `decision` names and stamps `viewed_at`.
    ///
    /// Fails with [`AttendanceError::AskForLeaveAlreadyDecided`] and leaves the request untouched
    /// if it has already been reviewed.
    pub fn review(&mut self, decision: Decision, now: NaiveDateTime) -> Result<()> {
        if !self.is_pending() {
            return Err(AttendanceError::AskForLeaveAlreadyDecided {
                request_id: self.request_id.clone(),
                status: self.status,
            });
        }

        self.status = decision.status();
        self.viewed_at = Some(now);
        Ok(())
    }

    pub fn approve(&mut self, now: NaiveDateTime) -> Result<()> {
        self.review(Decision::Approve, now)
    }

    pub fn disapprove(&mut self, now: NaiveDateTime) -> Result<()> {
        self.review(Decision::Disapprove, now)
    }

    pub fn view(&self) -> LeaveRequestView {
        LeaveRequestView {
            request_id: self.request_id.clone(),
            student_id: self.student_id.clone(),
            status: self.status,
            course_id: self.course_id.clone(),
            week: self.week,
            day: self.day,
            period: self.period,
            reason: self.reason.clone(),
            created_at: self.created_at.format(TIMESTAMP_FORMAT).to_string(),
            viewed_at: if self.is_pending() {
                None
            } else {
                self.viewed_at
                    .map(|viewed| viewed.format(TIMESTAMP_FORMAT).to_string())
            },
        }
    }
}

/// The display record of a [`LeaveRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveRequestView {
    pub request_id: String,
    pub student_id: String,
    pub status: LeaveStatus,
    pub course_id: String,
    pub week: i32,
    pub day: i32,
    pub period: i32,
    pub reason: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewed_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 20)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn pending() -> LeaveRequest {
        LeaveRequest::new(&RollKey::new("98008", 3, 2, 1), "ferris", "dentist", at(8))
    }

    #[test]
    fn new_request_is_pending() {
        let ask = pending();
        assert!(ask.is_pending());
        assert_eq!(ask.viewed_at, None);
        assert_eq!((ask.week, ask.day, ask.period), (3, 2, 1));
    }

    #[test]
    fn approve_stamps_viewed_at() {
        let mut ask = pending();
        ask.approve(at(10)).unwrap();

        assert!(ask.is_approved());
        assert_eq!(ask.viewed_at, Some(at(10)));
    }

    #[test]
    fn decided_request_cannot_be_reviewed_again() {
        let mut ask = pending();
        ask.approve(at(10)).unwrap();

        let err = ask.disapprove(at(11)).unwrap_err();
        assert_eq!(err.code(), "ASK_FOR_LEAVE_ALREADY_DECIDED");
        assert!(ask.is_approved());
        assert_eq!(ask.viewed_at, Some(at(10)));

        let mut ask = pending();
        ask.disapprove(at(10)).unwrap();
        assert!(ask.approve(at(11)).is_err());
        assert!(ask.is_disapproved());
    }

    #[test]
    fn view_omits_viewed_at_while_pending() {
        let mut ask = pending();
        let json = serde_json::to_value(ask.view()).unwrap();
        assert!(json.get("viewed_at").is_none());
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["created_at"], "2025-03-20 08:00:00");

        ask.disapprove(at(9)).unwrap();
        let json = serde_json::to_value(ask.view()).unwrap();
        assert_eq!(json["viewed_at"], "2025-03-20 09:00:00");
        assert_eq!(json["status"], "DISAPPROVED");
    }
}
