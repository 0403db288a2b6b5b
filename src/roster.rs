//! Reading course rosters from CSV exports.

use serde::Deserialize;
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// One line of a roster export. Columns other than `student_id` are ignored.
#[derive(Debug, Deserialize)]
struct RosterRecord {
    student_id: String,
}

/// The result of replacing a course roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterDiff {
    pub added: Vec<String>,
    pub dropped: Vec<String>,
}

/// Reads student IDs from a CSV roster with a `student_id` header, skipping blanks and repeats.
pub fn read_roster<R: io::Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut seen = HashSet::new();
    let mut students = Vec::new();
    for record in reader.deserialize() {
        let record: RosterRecord = record?;
        if !record.student_id.is_empty() && seen.insert(record.student_id.clone()) {
            students.push(record.student_id);
        }
    }

    Ok(students)
}

pub fn read_roster_file(path: &Path) -> Result<Vec<String>, csv::Error> {
    let file = std::fs::File::open(path)?;
    read_roster(file)
}
