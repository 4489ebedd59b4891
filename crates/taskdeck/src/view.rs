//! Plain-text rendering of the derived task view.

use std::io::{self, Write};

use taskdeck_core::Task;
use time::OffsetDateTime;

/// Marker column for a task relative to `now`.
fn due_marker(task: &Task, now: OffsetDateTime) -> &'static str {
    if task.is_overdue(now) {
        "overdue"
    } else if task.is_upcoming(now) {
        "soon"
    } else {
        "-"
    }
}

/// One table row for `task`.
pub fn task_line(task: &Task, now: OffsetDateTime) -> String {
    let id = task.id.map_or_else(|| "?".to_owned(), |id| id.to_string());
    let done = if task.done { "x" } else { " " };
    let reminder = if task.reminder { " *" } else { "" };
    let day = if task.day.is_empty() { "-" } else { task.day.as_str() };
    format!(
        "{id} | [{done}] | {}{reminder} | {day} | {} | {}",
        task.text,
        task.priority,
        due_marker(task, now)
    )
}

/// Write a header and one row per task.
pub fn render_table(out: &mut impl Write, tasks: &[Task], now: OffsetDateTime) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "No tasks found");
    }
    writeln!(out, "ID | Done | Text | Due | Priority | Status")?;
    writeln!(out, "-- | ---- | ---- | --- | -------- | ------")?;
    for task in tasks {
        writeln!(out, "{}", task_line(task, now))?;
    }
    Ok(())
}
