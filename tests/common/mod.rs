#![allow(dead_code)]

use course_attendance::{AttendanceManager, CourseSchedule, CourseSettings, SubCourse};
use tempfile::TempDir;

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

/// Opens a manager on a fresh, migrated database file in a temporary directory.
pub fn setup_manager() -> (TestDb, AttendanceManager) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("attendance.db").to_string_lossy().to_string();

    let manager = AttendanceManager::open(&path).expect("open database");
    (TestDb { _dir: dir, path }, manager)
}

pub fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Meets Mondays and Wednesdays in period 2 during weeks 1-3, and Wednesdays in period 4 during
/// weeks 2 and 4.
pub fn course(course_id: &str, students: &[&str]) -> SubCourse {
    SubCourse {
        course_id: course_id.to_string(),
        sub_id: "A".to_string(),
        name: "Intro to Rust".to_string(),
        teachers: strings(&["cjtsui", "bpeng"]),
        students: strings(students),
        schedules: vec![
            CourseSchedule {
                room_name: "GHC 4401".to_string(),
                room_id: "ghc-4401".to_string(),
                days: vec![1, 3],
                period: 2,
                weeks: vec![1, 2, 3],
            },
            CourseSchedule {
                room_name: "DH 2315".to_string(),
                room_id: "dh-2315".to_string(),
                days: vec![3],
                period: 4,
                weeks: vec![2, 4],
            },
        ],
        settings: CourseSettings {
            allow_late: Some(10),
        },
        classes: strings(&["cs-2027"]),
        pending_asks: vec![],
    }
}

/// Inserts [`course`] and reads it back.
pub fn seed_course(manager: &mut AttendanceManager, students: &[&str]) -> SubCourse {
    manager
        .insert_course(&course("98008", students))
        .expect("insert course");
    manager
        .get_course("98008")
        .expect("load course")
        .expect("course exists")
}
