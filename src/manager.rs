use crate::course::SubCourse;
use crate::db;
use crate::error::{AttendanceError, Result};
use crate::leave::{Decision, LeaveRequest};
use crate::roll::{AttendanceRoll, AttendanceStatus, CheckIn, RollView};
use crate::roster::RosterDiff;
use crate::settings::Settings;
use crate::store;
use chrono::{Local, NaiveDateTime};
use diesel::prelude::*;
use tracing::{debug, info, warn};

/// The manager for recording, modifying, and retrieving attendance data.
///
/// Every mutating method is a single statement or runs inside an immediate transaction, so the
/// write lock is held from the first read of a check-in or review until its last write.
pub struct AttendanceManager {
    db: SqliteConnection,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn require_course(conn: &mut SqliteConnection, course_id: &str) -> Result<SubCourse> {
    store::find_course(conn, course_id)?
        .ok_or_else(|| AttendanceError::CourseNotFound(course_id.to_string()))
}

fn require_roll(conn: &mut SqliteConnection, roll_id: &str) -> Result<AttendanceRoll> {
    store::find_roll(conn, roll_id)?.ok_or_else(|| AttendanceError::RollNotFound(roll_id.to_string()))
}

impl AttendanceManager {
    /// Creates a new `AttendanceManager` connected to the database named by [`Settings::load`].
    pub fn connect() -> Result<Self> {
        let settings = Settings::load()?;
        Self::open(&settings.database_url)
    }

    /// Creates a new `AttendanceManager` connected to the `sqlite3` database at `database_url`,
    /// running any pending migrations first.
    pub fn open(database_url: &str) -> Result<Self> {
        let db = db::establish(database_url)?;
        debug!(database_url, "connected to attendance database");
        Ok(Self { db })
    }

    /// Stores a new course with its roster, schedule and class groups.
    pub fn insert_course(&mut self, course: &SubCourse) -> Result<()> {
        self.db
            .immediate_transaction(|conn| store::insert_course(conn, course))?;

        info!(
            course_id = %course.course_id,
            students = course.students.len(),
            slots = course.schedules.len(),
            "inserted course"
        );
        Ok(())
    }

    /// Retrieves a course by its ID.
    pub fn get_course(&mut self, course_id: &str) -> Result<Option<SubCourse>> {
        store::find_course(&mut self.db, course_id)
    }

    /// Retrieves every course, ordered by ID.
    pub fn list_courses(&mut self) -> Result<Vec<SubCourse>> {
        self.db.transaction(|conn| {
            let mut courses = Vec::new();
            for course_id in store::course_ids(conn)? {
                courses.extend(store::find_course(conn, &course_id)?);
            }
            Ok(courses)
        })
    }

    /// Replaces a course's students with `students`.
    ///
    /// Students who stay keep their place on the roster; new students are appended in the order
    /// given. Rolls that already exist are not touched.
    pub fn update_roster(&mut self, course_id: &str, students: &[String]) -> Result<RosterDiff> {
        let diff = self.db.immediate_transaction(|conn| {
            require_course(conn, course_id)?;
            Ok::<_, AttendanceError>(store::replace_students(conn, course_id, students)?)
        })?;

        info!(
            course_id,
            added = diff.added.len(),
            dropped = diff.dropped.len(),
            "updated roster"
        );
        Ok(diff)
    }

    /// Returns the roll for one session of `course`, creating it on first access with every
    /// student on the current roster marked absent.
    ///
    /// Later calls with the same session return the existing roll unchanged.
    pub fn get_or_create_roll(
        &mut self,
        course: &SubCourse,
        week: i32,
        day: i32,
        period: i32,
    ) -> Result<Option<AttendanceRoll>> {
        let key = course.roll_key(week, day, period);
        let roll_id = key.to_string();

        self.db.immediate_transaction(|conn| {
            if store::create_roll(conn, &AttendanceRoll::new(&key, &course.students))? {
                info!(%roll_id, absent = course.students.len(), "created attendance roll");
            }
            Ok(store::find_roll(conn, &roll_id)?)
        })
    }

    /// Retrieves a roll by its ID without creating it.
    pub fn get_roll(&mut self, roll_id: &str) -> Result<Option<AttendanceRoll>> {
        Ok(store::find_roll(&mut self.db, roll_id)?)
    }

    /// Retrieves the leave requests linked to a roll.
    pub fn roll_leave_requests(&mut self, roll_id: &str) -> Result<Vec<LeaveRequest>> {
        Ok(store::roll_leave_requests(&mut self.db, roll_id)?)
    }

    /// Checks a student in to a roll.
    ///
    /// Fails with [`AttendanceError::AskForLeaveHasBeenApproved`] and changes nothing if the
    /// student's leave for this session was approved. Checking in twice is harmless.
    pub fn check_in(&mut self, roll_id: &str, student_id: &str) -> Result<CheckIn> {
        let result: Result<CheckIn> = self.db.immediate_transaction(|conn| {
            let roll = require_roll(conn, roll_id)?;
            let asks = store::roll_leave_requests(conn, roll_id)?;
            let check_in = roll.resolve_check_in(student_id, &asks)?;
            store::apply_check_in(conn, roll_id, student_id, &check_in)?;
            Ok(check_in)
        });

        match &result {
            Ok(check_in) => debug!(roll_id, student_id, ?check_in, "checked in"),
            Err(e) => warn!(roll_id, student_id, code = e.code(), "rejected check-in: {e}"),
        }
        result
    }

    /// Reports how a student stands on a roll.
    pub fn attendance_status(&mut self, roll_id: &str, student_id: &str) -> Result<AttendanceStatus> {
        self.db.transaction(|conn| {
            let roll = require_roll(conn, roll_id)?;
            let asks = store::roll_leave_requests(conn, roll_id)?;
            Ok(roll.attendance_status(student_id, &asks))
        })
    }

    /// Builds the display record of a roll against its course's current roster.
    pub fn roll_view(&mut self, roll_id: &str) -> Result<RollView> {
        self.db.transaction(|conn| {
            let roll = require_roll(conn, roll_id)?;
            let course = require_course(conn, &roll.course_id)?;
            let asks = store::roll_leave_requests(conn, roll_id)?;
            Ok(roll.view(&course, &asks))
        })
    }

    /// Flags a roll as processed. Returns `true` only for the call that flips the flag.
    pub fn mark_processed(&mut self, roll_id: &str) -> Result<bool> {
        let flipped = self.db.immediate_transaction(|conn| {
            require_roll(conn, roll_id)?;
            Ok::<_, AttendanceError>(store::mark_processed(conn, roll_id)?)
        })?;

        if flipped {
            info!(roll_id, "marked roll processed");
        }
        Ok(flipped)
    }

    /// Files a pending leave request for one session of a course.
    ///
    /// The student must be on the course roster, the course must meet at that session, and the
    /// student must not already have a request linked to the session's roll. The roll is created
    /// if this is the first time the session is touched.
    pub fn ask_for_leave(
        &mut self,
        course_id: &str,
        student_id: &str,
        week: i32,
        day: i32,
        period: i32,
        reason: &str,
    ) -> Result<LeaveRequest> {
        let ask = self.db.immediate_transaction(|conn| {
            let course = require_course(conn, course_id)?;
            if !course.is_enrolled(student_id) {
                return Err(AttendanceError::NotEnrolled {
                    student_id: student_id.to_string(),
                    course_id: course_id.to_string(),
                });
            }
            if !course.is_on(week, day, period) {
                return Err(AttendanceError::NoSuchSession {
                    course_id: course_id.to_string(),
                    week,
                    day,
                    period,
                });
            }

            let key = course.roll_key(week, day, period);
            let roll_id = key.to_string();
            store::create_roll(conn, &AttendanceRoll::new(&key, &course.students))?;

            let linked = store::roll_leave_requests(conn, &roll_id)?;
            if linked.iter().any(|ask| ask.student_id == student_id) {
                return Err(AttendanceError::AskForLeaveAlreadyExists {
                    student_id: student_id.to_string(),
                    roll_id,
                });
            }

            let ask = LeaveRequest::new(&key, student_id, reason, now());
            store::insert_leave_request(conn, &ask)?;
            Ok(ask)
        })?;

        info!(
            request_id = %ask.request_id,
            course_id,
            student_id,
            week,
            day,
            period,
            "filed leave request"
        );
        Ok(ask)
    }

    /// Approves or disapproves a pending leave request and takes it off its course's pending list.
    ///
    /// Fails with [`AttendanceError::AskForLeaveAlreadyDecided`] if the request was already
    /// reviewed.
    pub fn review_leave_request(
        &mut self,
        request_id: &str,
        decision: Decision,
    ) -> Result<LeaveRequest> {
        let result: Result<LeaveRequest> = self.db.immediate_transaction(|conn| {
            let mut ask = store::find_leave_request(conn, request_id)?
                .ok_or_else(|| AttendanceError::AskForLeaveNotFound(request_id.to_string()))?;
            ask.review(decision, now())?;
            store::save_review(conn, &ask)?;
            Ok(ask)
        });

        match &result {
            Ok(ask) => info!(request_id, status = %ask.status, "reviewed leave request"),
            Err(e) => warn!(request_id, code = e.code(), "rejected review: {e}"),
        }
        result
    }

    /// Retrieves a leave request by its ID.
    pub fn get_leave_request(&mut self, request_id: &str) -> Result<Option<LeaveRequest>> {
        Ok(store::find_leave_request(&mut self.db, request_id)?)
    }

    /// Retrieves every leave request a student has filed, oldest first.
    pub fn leave_requests_for_student(&mut self, student_id: &str) -> Result<Vec<LeaveRequest>> {
        Ok(store::student_leave_requests(&mut self.db, student_id)?)
    }

    /// Retrieves a course's unreviewed leave requests, in the order they were filed.
    pub fn pending_leave_requests(&mut self, course_id: &str) -> Result<Vec<LeaveRequest>> {
        Ok(store::pending_leave_requests(&mut self.db, course_id)?)
    }
}
