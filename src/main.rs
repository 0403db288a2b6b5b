use anyhow::{Context, bail};
use clap::Parser;
use course_attendance::cli::{Cli, Command};
use course_attendance::settings::Settings;
use course_attendance::{AttendanceManager, Decision, SubCourse, display, roster};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let mut manager = AttendanceManager::open(&settings.database_url)
        .with_context(|| format!("failed to open {}", settings.database_url))?;

    match cli.command {
        Command::ImportCourse { file_path } => {
            let json = std::fs::read_to_string(&file_path)
                .with_context(|| format!("failed to read {}", file_path.display()))?;
            let course: SubCourse = serde_json::from_str(&json)?;
            manager.insert_course(&course)?;
            println!("Imported course {}", course.course_id);
        }
        Command::ImportRoster {
            course_id,
            file_path,
        } => {
            let students = roster::read_roster_file(&file_path)?;
            let diff = manager.update_roster(&course_id, &students)?;
            println!("Students added: {:#?}", diff.added);
            println!("Students dropped: {:#?}", diff.dropped);
        }
        Command::ShowCourse { course_id, json } => {
            if json {
                let Some(course) = manager.get_course(&course_id)? else {
                    bail!("course {course_id} does not exist");
                };
                let pending = manager.pending_leave_requests(&course_id)?;
                println!("{}", serde_json::to_string_pretty(&course.full_view(&pending))?);
            } else {
                display::show_course(&mut manager, &course_id)?;
            }
        }
        Command::ShowRoll { session, json } => {
            let Some(course) = manager.get_course(&session.course_id)? else {
                bail!("course {} does not exist", session.course_id);
            };
            let Some(roll) =
                manager.get_or_create_roll(&course, session.week, session.day, session.period)?
            else {
                bail!("no roll for {}", session.key());
            };

            if json {
                let view = manager.roll_view(&roll.roll_id)?;
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                display::show_roll(&mut manager, &session.key())?;
            }
        }
        Command::CheckIn {
            session,
            student_id,
        } => {
            let Some(course) = manager.get_course(&session.course_id)? else {
                bail!("course {} does not exist", session.course_id);
            };
            if !course.is_on(session.week, session.day, session.period) {
                eprintln!("Warning: {} does not meet at this session", course.course_id);
            }
            let Some(roll) =
                manager.get_or_create_roll(&course, session.week, session.day, session.period)?
            else {
                bail!("no roll for {}", session.key());
            };

            match manager.check_in(&roll.roll_id, &student_id) {
                Ok(_) => println!("Checked in {student_id}"),
                Err(e) => bail!("{}: {e}", e.code()),
            }
        }
        Command::AskForLeave {
            session,
            student_id,
            reason,
        } => {
            let ask = manager.ask_for_leave(
                &session.course_id,
                &student_id,
                session.week,
                session.day,
                session.period,
                &reason,
            )?;
            println!("Filed leave request {}", ask.request_id);
        }
        Command::Approve { request_id } => {
            let ask = manager.review_leave_request(&request_id, Decision::Approve)?;
            println!("{}", serde_json::to_string_pretty(&ask.view())?);
        }
        Command::Disapprove { request_id } => {
            let ask = manager.review_leave_request(&request_id, Decision::Disapprove)?;
            println!("{}", serde_json::to_string_pretty(&ask.view())?);
        }
        Command::Status {
            session,
            student_id,
        } => {
            let status = manager.attendance_status(&session.key().to_string(), &student_id)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::MarkProcessed { session } => {
            if manager.mark_processed(&session.key().to_string())? {
                println!("Marked {} processed", session.key());
            } else {
                println!("{} was already processed", session.key());
            }
        }
        Command::LeaveRequests { student_id } => {
            let asks = manager.leave_requests_for_student(&student_id)?;
            display::show_leave_requests(&asks);
        }
    }

    Ok(())
}
