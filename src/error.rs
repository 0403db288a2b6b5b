//! The error type shared by every attendance operation.

use crate::models::LeaveStatus;

/// Errors raised while recording or querying attendance.
///
/// Every variant maps to a stable, uppercase code via [`AttendanceError::code`] so that callers
/// can report rejections without matching on the message text.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("student {student_id} cannot check in: their leave request has been approved")]
    AskForLeaveHasBeenApproved { student_id: String },

    #[error("leave request {request_id} has already been decided ({status})")]
    AskForLeaveAlreadyDecided {
        request_id: String,
        status: LeaveStatus,
    },

    #[error("student {student_id} already asked for leave from roll {roll_id}")]
    AskForLeaveAlreadyExists { student_id: String, roll_id: String },

    #[error("leave request {0} does not exist")]
    AskForLeaveNotFound(String),

    #[error("student {student_id} is not enrolled in course {course_id}")]
    NotEnrolled {
        student_id: String,
        course_id: String,
    },

    #[error("course {course_id} does not meet in week {week}, day {day}, period {period}")]
    NoSuchSession {
        course_id: String,
        week: i32,
        day: i32,
        period: i32,
    },

    #[error("course {0} does not exist")]
    CourseNotFound(String),

    #[error("attendance roll {0} does not exist")]
    RollNotFound(String),

    #[error("`{0}` is not a valid roll id, expected `<course>_<week>_<day>_<period>`")]
    InvalidRollId(String),

    #[error("invalid schedule data: {0}")]
    Schedule(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] diesel::result::Error),

    #[error(transparent)]
    Connection(#[from] diesel::ConnectionError),

    #[error("failed to run migrations: {0}")]
    Migration(String),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

impl AttendanceError {
    /// The stable code identifying this kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AskForLeaveHasBeenApproved { .. } => "ASK_FOR_LEAVE_HAS_BEEN_APPROVED",
            Self::AskForLeaveAlreadyDecided { .. } => "ASK_FOR_LEAVE_ALREADY_DECIDED",
            Self::AskForLeaveAlreadyExists { .. } => "ASK_FOR_LEAVE_ALREADY_EXISTS",
            Self::AskForLeaveNotFound(_) => "ASK_FOR_LEAVE_NOT_FOUND",
            Self::NotEnrolled { .. } => "NOT_ENROLLED",
            Self::NoSuchSession { .. } => "NO_SUCH_SESSION",
            Self::CourseNotFound(_) => "COURSE_NOT_FOUND",
            Self::RollNotFound(_) => "ROLL_NOT_FOUND",
            Self::InvalidRollId(_) => "INVALID_ROLL_ID",
            Self::Schedule(_) | Self::Database(_) | Self::Connection(_) | Self::Migration(_) => {
                "DATABASE_ERROR"
            }
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T, E = AttendanceError> = std::result::Result<T, E>;
