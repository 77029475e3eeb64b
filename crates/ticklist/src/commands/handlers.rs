use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use ticklist_app::{
    AddTaskInput, EditTaskInput, TaskFilterBuilder, TaskService, TaskStore, TaskWarning,
};
use ticklist_core::{TaskId, TaskQuery};

use crate::LsFormat;
use crate::view::{format_row, render_json, render_table};

pub fn handle_add<S: TaskStore>(
    service: &mut TaskService<S>,
    title: String,
    priority: Option<String>,
    due: Option<String>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let output = service.add(AddTaskInput {
        title,
        priority: priority.unwrap_or_default(),
        due: due.unwrap_or_default(),
    })?;
    report_warnings(err, &output.warnings)?;
    writeln!(out, "added task {}: {}", output.task.id, output.task.title)?;
    Ok(())
}

pub fn handle_ls<S: TaskStore>(
    service: &TaskService<S>,
    defaults: TaskQuery,
    status: Option<&str>,
    priority: Option<&str>,
    format: LsFormat,
    out: &mut impl Write,
) -> Result<()> {
    let query = build_query(defaults, status, priority)?;
    let tasks = service.list(&query);
    match format {
        LsFormat::Table => render_table(out, &tasks)?,
        LsFormat::Json => render_json(out, &tasks)?,
    }
    Ok(())
}

pub fn handle_done<S: TaskStore>(
    service: &mut TaskService<S>,
    id: &str,
    out: &mut impl Write,
) -> Result<()> {
    let id = parse_task_id(id)?;
    let output = service.complete(id)?;
    if output.already_done {
        writeln!(out, "task {id} was already completed")?;
    } else {
        writeln!(out, "completed task {id}")?;
    }
    Ok(())
}

pub fn handle_rm<S: TaskStore>(
    service: &mut TaskService<S>,
    id: &str,
    out: &mut impl Write,
) -> Result<()> {
    let id = parse_task_id(id)?;
    let removed = service.remove(id)?;
    writeln!(out, "removed task {}: {}", removed.id, removed.title)?;
    Ok(())
}

pub fn handle_edit<S: TaskStore>(
    service: &mut TaskService<S>,
    id: &str,
    title: Option<String>,
    priority: Option<String>,
    due: Option<String>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let id = parse_task_id(id)?;
    let output = service.edit(EditTaskInput {
        id,
        title: title.unwrap_or_default(),
        priority: priority.unwrap_or_default(),
        due: due.unwrap_or_default(),
    })?;
    report_warnings(err, &output.warnings)?;
    writeln!(out, "updated task {id}")?;
    writeln!(out, "{}", format_row(&output.task))?;
    Ok(())
}

/// Combine configured list defaults with command-line filter tokens.
pub fn build_query(
    defaults: TaskQuery,
    status: Option<&str>,
    priority: Option<&str>,
) -> Result<TaskQuery> {
    let query = TaskFilterBuilder::from_query(defaults)
        .with_status(status)
        .and_then(|builder| builder.with_priority(priority))
        .map_err(|err| anyhow!(err.describe_user_facing()))?
        .build();
    Ok(query)
}

pub fn report_warnings(err: &mut impl Write, warnings: &[TaskWarning]) -> Result<()> {
    for warning in warnings {
        writeln!(err, "warning: {warning}")?;
    }
    Ok(())
}

pub fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::from_str(raw.trim()).with_context(|| format!("Invalid task id: {raw}"))
}
