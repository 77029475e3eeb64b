use std::io::{self, BufRead, Write};

use anyhow::Result;
use ticklist_app::{TaskService, TaskStore};
use ticklist_core::TaskQuery;

use crate::Command;

mod handlers;
mod menu;

use handlers::{handle_add, handle_done, handle_edit, handle_ls, handle_rm};

/// Dispatch a parsed command against stdin/stdout/stderr.
pub fn run<S: TaskStore>(
    command: Command,
    service: &mut TaskService<S>,
    list_defaults: TaskQuery,
) -> Result<()> {
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    dispatch(command, service, list_defaults, io::stdin().lock(), &mut out, &mut err)
}

fn dispatch<S: TaskStore>(
    command: Command,
    service: &mut TaskService<S>,
    list_defaults: TaskQuery,
    input: impl BufRead,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Add {
            title,
            priority,
            due,
        } => handle_add(service, title, priority, due, out, err),
        Command::Ls {
            status,
            priority,
            format,
        } => handle_ls(service, list_defaults, status.as_deref(), priority.as_deref(), format, out),
        Command::Done { id } => handle_done(service, &id, out),
        Command::Rm { id } => handle_rm(service, &id, out),
        Command::Edit {
            id,
            title,
            priority,
            due,
        } => handle_edit(service, &id, title, priority, due, out, err),
        Command::Menu => menu::run(service, list_defaults, input, out),
    }
}
