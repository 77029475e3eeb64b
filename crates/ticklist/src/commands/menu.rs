//! Interactive numbered menu over any line-oriented input.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use ticklist_app::{
    AddTaskInput, DuePatch, EditTaskInput, TaskError, TaskService, TaskStore, TaskWarning,
};
use ticklist_core::{TaskId, TaskQuery, due};

use super::handlers::build_query;
use crate::view::render_table;

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    List,
    Complete,
    Remove,
    Edit,
    Exit,
}

impl MenuChoice {
    pub const ALL: [Self; 6] = [
        Self::Add,
        Self::List,
        Self::Complete,
        Self::Remove,
        Self::Edit,
        Self::Exit,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Add => "1",
            Self::List => "2",
            Self::Complete => "3",
            Self::Remove => "4",
            Self::Edit => "5",
            Self::Exit => "0",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "Add task",
            Self::List => "List tasks",
            Self::Complete => "Mark complete",
            Self::Remove => "Remove task",
            Self::Edit => "Edit task",
            Self::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|choice| choice.key() == input)
    }
}

/// Run the menu until the user exits or input ends.
///
/// Input problems are reported and the menu continues; storage failures end it.
pub fn run<S, R, W>(
    service: &mut TaskService<S>,
    list_defaults: TaskQuery,
    input: R,
    output: W,
) -> Result<()>
where
    S: TaskStore,
    R: BufRead,
    W: Write,
{
    Menu {
        service,
        list_defaults,
        prompt: Prompt { input, output },
    }
    .run()
}

struct Menu<'a, S, R, W> {
    service: &'a mut TaskService<S>,
    list_defaults: TaskQuery,
    prompt: Prompt<R, W>,
}

impl<S: TaskStore, R: BufRead, W: Write> Menu<'_, S, R, W> {
    fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.prompt.ask("Choose: ")? else {
                return Ok(());
            };
            let Some(choice) = MenuChoice::parse(&line) else {
                self.prompt.say("Invalid choice.")?;
                continue;
            };
            match choice {
                MenuChoice::Add => self.add()?,
                MenuChoice::List => self.list()?,
                MenuChoice::Complete => self.complete()?,
                MenuChoice::Remove => self.remove()?,
                MenuChoice::Edit => self.edit()?,
                MenuChoice::Exit => return Ok(()),
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        self.prompt.say("")?;
        self.prompt.say("=== To-Do List ===")?;
        for choice in MenuChoice::ALL {
            self.prompt.say(format_args!("{}. {}", choice.key(), choice.label()))?;
        }
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        let Some(title) = self.prompt.ask("Task title: ")? else {
            return Ok(());
        };
        if title.trim().is_empty() {
            self.prompt.say("Title required.")?;
            return Ok(());
        }
        let Some(priority) = self.prompt.ask("Priority [low/med/high] (default med): ")? else {
            return Ok(());
        };
        let Some(due) = self.ask_new_due()? else {
            return Ok(());
        };

        let result = self.service.add(AddTaskInput {
            title,
            priority,
            due,
        });
        if let Some(output) = self.report(result)? {
            self.warn(&output.warnings)?;
            self.prompt
                .say(format_args!("Added #{}: {}", output.task.id, output.task.title))?;
        }
        Ok(())
    }

    fn list(&mut self) -> Result<()> {
        let Some(status) = self.prompt.ask("Status [all/open/done] (blank for default): ")? else {
            return Ok(());
        };
        let Some(priority) = self
            .prompt
            .ask("Priority [any/low/med/high] (blank for default): ")?
        else {
            return Ok(());
        };
        let query = match build_query(self.list_defaults, Some(&status), Some(&priority)) {
            Ok(query) => query,
            Err(err) => {
                self.prompt.say(err)?;
                return Ok(());
            }
        };
        let tasks = self.service.list(&query);
        render_table(&mut self.prompt.output, &tasks)?;
        Ok(())
    }

    fn complete(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("Task ID: ")? else {
            return Ok(());
        };
        let result = self.service.complete(id);
        if let Some(output) = self.report(result)? {
            if output.already_done {
                self.prompt.say(format_args!("#{id} was already complete."))?;
            } else {
                self.prompt.say(format_args!("Marked #{id} complete."))?;
            }
        }
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("Task ID: ")? else {
            return Ok(());
        };
        let result = self.service.remove(id);
        if self.report(result)?.is_some() {
            self.prompt.say(format_args!("Removed #{id}."))?;
        }
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        let Some(id) = self.ask_id("Task ID to edit: ")? else {
            return Ok(());
        };
        let Some(current) = self.service.get(id).cloned() else {
            self.prompt.say(TaskError::NotFound(id))?;
            return Ok(());
        };

        let Some(title) = self
            .prompt
            .ask(&format!("New title (blank to keep '{}'): ", current.title))?
        else {
            return Ok(());
        };
        let Some(priority) = self.prompt.ask(&format!(
            "New priority [low/med/high] (current {}): ",
            current.priority
        ))?
        else {
            return Ok(());
        };
        let current_due = current
            .due
            .map_or_else(|| "-".to_owned(), |date| date.to_string());
        let Some(due) = self.ask_due_patch(&current_due)? else {
            return Ok(());
        };

        let result = self.service.edit(EditTaskInput {
            id,
            title,
            priority,
            due,
        });
        if let Some(output) = self.report(result)? {
            self.warn(&output.warnings)?;
            self.prompt.say(format_args!("Updated #{id}."))?;
        }
        Ok(())
    }

    /// Re-prompt until the input is blank or a valid date.
    fn ask_new_due(&mut self) -> Result<Option<String>> {
        loop {
            let Some(input) = self.prompt.ask("Due date (YYYY-MM-DD, optional): ")? else {
                return Ok(None);
            };
            match due::validate(&input) {
                Ok(_) => return Ok(Some(input)),
                Err(err) => self.prompt.say(err)?,
            }
        }
    }

    /// Re-prompt until the input keeps, clears, or sets a valid date.
    fn ask_due_patch(&mut self, current: &str) -> Result<Option<String>> {
        let token = self.service.clear_due_token().to_owned();
        let question = format!(
            "New due date (YYYY-MM-DD, blank to keep, '{token}' to clear; current {current}): "
        );
        loop {
            let Some(input) = self.prompt.ask(&question)? else {
                return Ok(None);
            };
            match DuePatch::parse(&input, &token) {
                Ok(_) => return Ok(Some(input)),
                Err(err) => self.prompt.say(err)?,
            }
        }
    }

    fn ask_id(&mut self, question: &str) -> Result<Option<TaskId>> {
        loop {
            let Some(input) = self.prompt.ask(question)? else {
                return Ok(None);
            };
            match input.trim().parse::<TaskId>() {
                Ok(id) => return Ok(Some(id)),
                Err(_) => self.prompt.say("Enter a task number.")?,
            }
        }
    }

    /// Print recoverable errors and carry on; storage failures propagate.
    fn report<T>(&mut self, result: Result<T, TaskError>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err @ TaskError::PersistenceUnavailable { .. }) => Err(err.into()),
            Err(err) => {
                self.prompt.say(err)?;
                Ok(None)
            }
        }
    }

    fn warn(&mut self, warnings: &[TaskWarning]) -> io::Result<()> {
        for warning in warnings {
            self.prompt.say(format_args!("warning: {warning}"))?;
        }
        Ok(())
    }
}

struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    /// `None` once input is exhausted.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }
}
