use crate::error::{AttendanceError, Result};
use crate::leave::LeaveRequest;
use crate::manager::AttendanceManager;
use crate::roll::{AttendanceStatus, RollKey};
use tabled::{Table, Tabled, settings::Style};

fn join(numbers: &[i32]) -> String {
    numbers
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Pretty prints a course's meeting slots and roster.
pub fn show_course(manager: &mut AttendanceManager, course_id: &str) -> Result<()> {
    let course = manager
        .get_course(course_id)?
        .ok_or_else(|| AttendanceError::CourseNotFound(course_id.to_string()))?;

    #[derive(Tabled)]
    struct Slot {
        room: String,
        days: String,
        period: i32,
        weeks: String,
    }

    let slots: Vec<Slot> = course
        .schedules
        .iter()
        .map(|schedule| Slot {
            room: format!("{} ({})", schedule.room_name, schedule.room_id),
            days: join(&schedule.days),
            period: schedule.period,
            weeks: join(&schedule.weeks),
        })
        .collect();

    let mut table = Table::new(slots);
    table.with(Style::modern());

    println!("{} {} ({})", course.course_id, course.name, course.sub_id);
    println!("Teachers: {}", course.teachers.join(", "));
    println!("Schedule:\n{table}");
    println!("Students ({}): {}", course.students.len(), course.students.join(", "));
    println!("Pending leave requests: {}", course.pending_asks.len());

    Ok(())
}

/// Pretty prints the attendance of every student on the roster for one session.
pub fn show_roll(manager: &mut AttendanceManager, key: &RollKey) -> Result<()> {
    let roll_id = key.to_string();
    let course = manager
        .get_course(&key.course_id)?
        .ok_or_else(|| AttendanceError::CourseNotFound(key.course_id.clone()))?;

    #[derive(Tabled)]
    struct Line {
        student: String,
        status: String,
    }

    let mut lines = Vec::with_capacity(course.students.len());
    for student in &course.students {
        let status = match manager.attendance_status(&roll_id, student)? {
            AttendanceStatus::Absent => "absent".to_string(),
            AttendanceStatus::Present => "present".to_string(),
            AttendanceStatus::HasAskedForLeave(ask) => {
                format!("asked for leave ({})", ask.status.to_string().to_lowercase())
            }
        };
        lines.push(Line {
            student: student.clone(),
            status,
        });
    }

    let mut table = Table::new(lines);
    table.with(Style::modern());

    println!("Roll {roll_id}:\n{table}");

    Ok(())
}

/// Pretty prints a list of leave requests.
pub fn show_leave_requests(asks: &[LeaveRequest]) {
    #[derive(Tabled)]
    struct Line {
        id: String,
        student: String,
        session: String,
        status: String,
        reason: String,
    }

    let lines: Vec<Line> = asks
        .iter()
        .map(|ask| Line {
            id: ask.request_id.clone(),
            student: ask.student_id.clone(),
            session: RollKey::new(&ask.course_id, ask.week, ask.day, ask.period).to_string(),
            status: ask.status.to_string(),
            reason: ask.reason.clone(),
        })
        .collect();

    let mut table = Table::new(lines);
    table.with(Style::modern());

    println!("{table}");
}
