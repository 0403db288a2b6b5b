//! This module contains the command-line interface [`Cli`] parser for managing courses, attendance
//! rolls and leave requests.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::RollKey;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(name = "course-attendance", version, about)]
pub struct Cli {
    /// The different commands available for managing attendance records.
    #[command(subcommand)]
    pub command: Command,
}

/// A single meeting of a course.
#[derive(Args, Debug, Clone)]
pub struct Session {
    pub course_id: String,
    pub week: i32,
    pub day: i32,
    pub period: i32,
}

impl Session {
    pub fn key(&self) -> RollKey {
        RollKey::new(&self.course_id, self.week, self.day, self.period)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a course described by a JSON file.
    ImportCourse { file_path: PathBuf },

    /// Replace a course's students with those listed in a CSV roster.
    ImportRoster { course_id: String, file_path: PathBuf },

    /// Show a course's schedule and roster.
    ShowCourse {
        course_id: String,

        /// Print the full course record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show who is present, absent, and excused for a session.
    ShowRoll {
        #[command(flatten)]
        session: Session,

        /// Print the roll summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check a student in to a session.
    CheckIn {
        #[command(flatten)]
        session: Session,
        student_id: String,
    },

    /// File a leave request for a student.
    AskForLeave {
        #[command(flatten)]
        session: Session,
        student_id: String,
        reason: String,
    },

    /// Approve a pending leave request.
    Approve { request_id: String },

    /// Disapprove a pending leave request.
    Disapprove { request_id: String },

    /// Show a single student's attendance status for a session.
    Status {
        #[command(flatten)]
        session: Session,
        student_id: String,
    },

    /// Flag a session's roll as processed.
    MarkProcessed {
        #[command(flatten)]
        session: Session,
    },

    /// List every leave request a student has filed.
    LeaveRequests { student_id: String },
}
