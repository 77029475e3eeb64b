//! CLI entry point for ticklist.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use ticklist_app::{JsonStore, ProjectConfig, TaskService};

mod commands;
mod view;

/// Personal task list kept in a local JSON file.
#[derive(Parser, Debug)]
#[command(
    name = "ticklist",
    version,
    about = "ticklist: add, list, edit, complete and remove tasks"
)]
struct Cli {
    /// Base directory for configuration and the default data file.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Data file to use instead of the configured one.
    #[arg(long)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new task.
    Add {
        title: String,
        /// low, med or high (default med).
        #[arg(short, long)]
        priority: Option<String>,
        /// Due date as YYYY-MM-DD.
        #[arg(short, long)]
        due: Option<String>,
    },

    /// List tasks in display order.
    Ls {
        /// all, open or done.
        #[arg(long)]
        status: Option<String>,
        /// any, low, med or high.
        #[arg(long)]
        priority: Option<String>,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Mark a task as completed.
    Done { id: String },

    /// Remove a task.
    Rm { id: String },

    /// Change title, priority or due date. Omitted flags keep the current value.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// New due date, or the clear token (default `none`) to remove it.
        #[arg(long)]
        due: Option<String>,
    },

    /// Interactive numbered menu.
    Menu,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LsFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli { dir, file, cmd } = Cli::parse();
    install_tracing();
    execute_command(&dir, file, cmd)
}

fn execute_command(dir: &Path, file: Option<PathBuf>, command: Command) -> Result<()> {
    let config = ProjectConfig::load(dir)?;
    let data_file = file.unwrap_or_else(|| config.storage.resolve(dir));
    debug!(path = %data_file.display(), "Using task file");

    let store = JsonStore::open(data_file.clone());
    let mut service = TaskService::open(store)
        .with_context(|| format!("failed to load tasks from {}", data_file.display()))?
        .with_clear_due_token(config.edit.clear_due_token());
    let list_defaults = config.list.default_query()?;

    commands::run(command, &mut service, list_defaults)
}

fn install_tracing() {
    // RUST_LOG overrides; stdout is reserved for command output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
