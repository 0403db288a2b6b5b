//! Attendance records for course sessions: courses and their weekly schedules, per-session
//! attendance rolls, and students' leave requests, stored in SQLite through Diesel.

pub mod cli;
pub mod course;
pub mod db;
pub mod display;
pub mod error;
pub mod leave;
pub mod manager;
pub mod models;
pub mod roll;
pub mod roster;
pub mod schema;
pub mod settings;
mod store;

pub use crate::course::{CourseSchedule, CourseSettings, SubCourse};
pub use crate::error::{AttendanceError, Result};
pub use crate::leave::{Decision, LeaveRequest};
pub use crate::manager::AttendanceManager;
pub use crate::models::LeaveStatus;
pub use crate::roll::{AttendanceRoll, AttendanceStatus, CheckIn, RollKey, RollView};

/// Creates an [`AttendanceManager`] for the database named in `config.toml` or `DATABASE_URL`.
pub fn create_default_manager() -> Result<AttendanceManager> {
    AttendanceManager::connect()
}
