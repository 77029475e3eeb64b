//! Application layer logic for ticklist.
//!
//! This crate provides the task operations, the storage seam, configuration,
//! and input normalization shared by the command-line and interactive frontends.

pub mod config;
pub mod filter_util;
pub mod service;
pub mod task_patch;
pub mod task_store;

// Re-exports for convenience
pub use config::{EditConfig, ListConfig, ProjectConfig, StorageConfig};
pub use filter_util::{FilterBuildError, TaskFilterBuilder, parse_priority_filter};
pub use service::{
    AddTaskInput, AddTaskOutput, CompleteTaskOutput, EditTaskInput, EditTaskOutput, TaskError,
    TaskService,
};
pub use task_patch::{DEFAULT_CLEAR_DUE_TOKEN, DuePatch, TaskPatch, TaskWarning};
pub use task_store::TaskStore;
pub use ticklist_store_json::{JsonStore, JsonStoreError};
