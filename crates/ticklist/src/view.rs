use std::io::{self, Write};

use anyhow::Result;
use ticklist_core::Task;

const EMPTY_LIST: &str = "No tasks.";

/// Write `tasks` as an aligned table, or a placeholder line when empty.
pub fn render_table(out: &mut impl Write, tasks: &[Task]) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "{EMPTY_LIST}");
    }
    writeln!(out, "{:<4} {:<6} {:<4} {:<10} Title", "ID", "Status", "Pri", "Due")?;
    for task in tasks {
        writeln!(out, "{}", format_row(task))?;
    }
    Ok(())
}

/// Write `tasks` as pretty-printed JSON in the data file layout.
pub fn render_json(out: &mut impl Write, tasks: &[Task]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, tasks)?;
    writeln!(out)?;
    Ok(())
}

/// One table row.
pub fn format_row(task: &Task) -> String {
    let due = task.due.map_or_else(|| "-".to_owned(), |date| date.to_string());
    format!(
        "{:<4} {:<6} {:<4} {:<10} {}",
        task.id,
        status_label(task),
        task.priority.as_str(),
        due,
        task.title
    )
}

const fn status_label(task: &Task) -> &'static str {
    if task.completed { "DONE" } else { "OPEN" }
}
