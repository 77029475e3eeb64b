//! Runs the built `ticklist` binary against scratch directories.

#![allow(missing_docs)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use assert_cmd::cargo::CommandCargoExt;
use serde_json::Value;
use tempfile::TempDir;

fn ticklist(dir: &Path, args: &[&str]) -> Result<Output> {
    Command::cargo_bin("ticklist")?
        .arg("--dir")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .context("failed to run ticklist")
}

fn success(dir: &Path, args: &[&str]) -> Result<String> {
    let output = ticklist(dir, args)?;
    if !output.status.success() {
        return Err(anyhow!(
            "ticklist {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(String::from_utf8(output.stdout)?)
}

fn listed_ids(dir: &Path, args: &[&str]) -> Result<Vec<u64>> {
    let mut full = vec!["ls", "--format", "json"];
    full.extend_from_slice(args);
    let value: Value = serde_json::from_str(&success(dir, &full)?)?;
    value
        .as_array()
        .ok_or_else(|| anyhow!("expected a JSON array"))?
        .iter()
        .map(|task| task["id"].as_u64().ok_or_else(|| anyhow!("task without id")))
        .collect()
}

#[test]
fn tasks_persist_between_invocations() -> Result<()> {
    let temp = TempDir::with_prefix("ticklist-cli-")?;
    let dir = temp.path();

    success(dir, &["add", "A", "-p", "high", "-d", "2024-01-10"])?;
    success(dir, &["add", "B", "-p", "low"])?;
    success(dir, &["add", "C", "-p", "high", "-d", "2024-01-05"])?;
    assert_eq!(success(dir, &["done", "3"])?, "completed task 3\n");

    assert_eq!(listed_ids(dir, &[])?, vec![1, 2, 3]);
    assert_eq!(listed_ids(dir, &["--status", "open", "--priority", "high"])?, vec![1]);

    let table = success(dir, &["ls"])?;
    assert!(table.starts_with("ID   Status Pri  Due        Title\n"));
    assert!(table.contains("3    DONE   high 2024-01-05 C"));

    let stored: Value = serde_json::from_str(&fs::read_to_string(dir.join("tasks.json"))?)?;
    assert_eq!(stored.as_array().map(Vec::len), Some(3));
    Ok(())
}

#[test]
fn invalid_priority_warns_on_stderr() -> Result<()> {
    let temp = TempDir::with_prefix("ticklist-cli-")?;
    let output = ticklist(temp.path(), &["add", "Read", "-p", "urgent"])?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "added task 1: Read\n");
    assert!(String::from_utf8(output.stderr)?.contains("invalid priority `urgent`; using `med`"));
    Ok(())
}

#[test]
fn failures_exit_non_zero_without_writing() -> Result<()> {
    let temp = TempDir::with_prefix("ticklist-cli-")?;
    let dir = temp.path();

    assert!(!ticklist(dir, &["add", "   "])?.status.success());
    assert!(!ticklist(dir, &["add", "Taxes", "-d", "2024-02-30"])?.status.success());
    assert!(!dir.join("tasks.json").exists());

    success(dir, &["add", "Taxes"])?;
    let before = fs::read_to_string(dir.join("tasks.json"))?;
    let output = ticklist(dir, &["rm", "99"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("task 99 not found"));
    assert_eq!(fs::read_to_string(dir.join("tasks.json"))?, before);
    Ok(())
}

#[test]
fn edit_clears_due_with_configured_token() -> Result<()> {
    let temp = TempDir::with_prefix("ticklist-cli-")?;
    let dir = temp.path();
    fs::create_dir_all(dir.join(".ticklist"))?;
    fs::write(
        dir.join(".ticklist").join("config.toml"),
        "[edit]\nclear_due_token = \"-\"\n",
    )?;

    success(dir, &["add", "Plan trip", "-d", "2024-06-01"])?;
    success(dir, &["edit", "1", "--due", "-", "--priority", "high"])?;

    let stored: Value = serde_json::from_str(&fs::read_to_string(dir.join("tasks.json"))?)?;
    assert!(stored[0]["due"].is_null());
    assert_eq!(stored[0]["priority"], "high");
    assert_eq!(stored[0]["title"], "Plan trip");
    Ok(())
}

#[test]
fn corrupt_file_is_reported_and_kept() -> Result<()> {
    let temp = TempDir::with_prefix("ticklist-cli-")?;
    let dir = temp.path();
    fs::write(dir.join("tasks.json"), "{ broken")?;

    let output = ticklist(dir, &["ls"])?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr)?.contains("failed to load tasks"));
    assert_eq!(fs::read_to_string(dir.join("tasks.json"))?, "{ broken");
    Ok(())
}

#[test]
fn menu_runs_from_piped_input() -> Result<()> {
    let temp = TempDir::with_prefix("ticklist-cli-")?;
    let dir = temp.path();

    let output = Command::cargo_bin("ticklist")?
        .arg("--dir")
        .arg(dir)
        .arg("menu")
        .stdin(fs::File::open(write_script(dir, "1\nWater plants\n\n\n2\n\n\n0\n")?)?)
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Added #1: Water plants"));
    assert!(stdout.contains("1    OPEN   med  -          Water plants"));
    Ok(())
}

fn write_script(dir: &Path, script: &str) -> Result<std::path::PathBuf> {
    let path = dir.join("script.txt");
    fs::write(&path, script)?;
    Ok(path)
}
