//! Courses, their weekly meeting slots, and the display records built from them.

use crate::leave::{LeaveRequest, LeaveRequestView};
use crate::roll::RollKey;
use serde::{Deserialize, Serialize};

/// A single weekly meeting slot: one room, one period, on a set of weekdays during a set of weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSchedule {
    pub room_name: String,
    pub room_id: String,
    pub days: Vec<i32>,
    pub period: i32,
    pub weeks: Vec<i32>,
}

impl CourseSchedule {
    /// Whether this slot meets in the given week, on the given day, during the given period.
    pub fn covers(&self, week: i32, day: i32, period: i32) -> bool {
        self.period == period && self.weeks.contains(&week) && self.days.contains(&day)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSettings {
    /// Minutes after the start of a period during which a check-in still counts.
    pub allow_late: Option<i32>,
}

/// A teachable section of a course.
///
/// The roster, class groups and pending leave requests are kept as identifier lists; the records
/// they point to are looked up through the [`AttendanceManager`](crate::manager::AttendanceManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCourse {
    pub course_id: String,
    pub sub_id: String,
    pub name: String,
    #[serde(default)]
    pub teachers: Vec<String>,
    #[serde(default)]
    pub students: Vec<String>,
    #[serde(default, alias = "times")]
    pub schedules: Vec<CourseSchedule>,
    #[serde(default)]
    pub settings: CourseSettings,
    #[serde(default)]
    pub classes: Vec<String>,
    /// IDs of leave requests for this course that have not been reviewed yet.
    #[serde(default)]
    pub pending_asks: Vec<String>,
}

impl SubCourse {
    /// Returns `true` if any of the course's slots meets at `(week, day, period)`.
    pub fn is_on(&self, week: i32, day: i32, period: i32) -> bool {
        self.schedules
            .iter()
            .any(|schedule| schedule.covers(week, day, period))
    }

    /// The key of this course's attendance roll for a single session.
    pub fn roll_key(&self, week: i32, day: i32, period: i32) -> RollKey {
        RollKey::new(&self.course_id, week, day, period)
    }

    pub fn is_enrolled(&self, student_id: &str) -> bool {
        self.students.iter().any(|s| s == student_id)
    }

    pub fn brief_view(&self) -> CourseBrief {
        CourseBrief {
            course_id: self.course_id.clone(),
            course_name: self.name.clone(),
            times: self.schedules.clone(),
        }
    }

    /// Builds the full display record. `pending` should hold the requests named by
    /// `pending_asks`; any other request passed in is left out.
    pub fn full_view(&self, pending: &[LeaveRequest]) -> CourseDetail {
        let pending_asks = self
            .pending_asks
            .iter()
            .filter_map(|id| pending.iter().find(|ask| &ask.request_id == id))
            .map(LeaveRequest::view)
            .collect();

        CourseDetail {
            brief: self.brief_view(),
            sub_id: self.sub_id.clone(),
            teachers: self.teachers.clone(),
            students: self.students.clone(),
            classes: self.classes.clone(),
            settings: self.settings.clone(),
            pending_asks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseBrief {
    pub course_id: String,
    pub course_name: String,
    pub times: Vec<CourseSchedule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub brief: CourseBrief,
    pub sub_id: String,
    pub teachers: Vec<String>,
    pub students: Vec<String>,
    pub classes: Vec<String>,
    pub settings: CourseSettings,
    pub pending_asks: Vec<LeaveRequestView>,
}
