use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use ticklist_core::{TaskQuery, due};

use crate::filter_util::TaskFilterBuilder;
use crate::task_patch::DEFAULT_CLEAR_DUE_TOKEN;

const CONFIG_DIR: &str = ".ticklist";
const CONFIG_FILE: &str = "config.toml";
const USER_CONFIG_DIR: &str = "ticklist";
const DEFAULT_DATA_FILE: &str = "tasks.json";

/// Top-level configuration loaded from `.ticklist/config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// `[storage]` table.
    #[serde(default)]
    pub storage: StorageConfig,
    /// `[edit]` table.
    #[serde(default)]
    pub edit: EditConfig,
    /// `[list]` table.
    #[serde(default)]
    pub list: ListConfig,
}

impl ProjectConfig {
    /// Load configuration for `base_dir`: the project file wins, then the user
    /// file under the platform config directory, then built-in defaults.
    pub fn load(base_dir: impl AsRef<Path>) -> Result<Self> {
        let project = Self::project_path(base_dir);
        if project.exists() {
            return Self::from_file(&project);
        }
        if let Some(user) = Self::user_path()
            && user.exists()
        {
            return Self::from_file(&user);
        }
        Ok(Self::default())
    }

    /// Project-level configuration path for `base_dir`.
    #[must_use]
    pub fn project_path(base_dir: impl AsRef<Path>) -> PathBuf {
        base_dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// User-level configuration path, if the platform has a config directory.
    #[must_use]
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load and validate a specific configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.storage.ensure_valid_file()?;
        self.edit.ensure_valid_clear_token()?;
        self.list.default_query().map(|_| ())
    }
}

/// Where the task list lives.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default = "default_data_file")]
    file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: default_data_file(),
        }
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

impl StorageConfig {
    /// Data file resolved against `base_dir`.
    #[must_use]
    pub fn resolve(&self, base_dir: impl AsRef<Path>) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            base_dir.as_ref().join(&self.file)
        }
    }

    fn ensure_valid_file(&self) -> Result<()> {
        if self.file.as_os_str().is_empty() {
            bail!("storage file must not be empty");
        }
        Ok(())
    }
}

/// Edit behaviour.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EditConfig {
    #[serde(default = "default_clear_token")]
    clear_due_token: String,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            clear_due_token: default_clear_token(),
        }
    }
}

fn default_clear_token() -> String {
    DEFAULT_CLEAR_DUE_TOKEN.to_owned()
}

impl EditConfig {
    /// Reserved token that clears a due date.
    #[must_use]
    pub fn clear_due_token(&self) -> &str {
        self.clear_due_token.trim()
    }

    fn ensure_valid_clear_token(&self) -> Result<()> {
        let token = self.clear_due_token();
        if token.is_empty() {
            bail!("clear_due_token must not be empty");
        }
        if due::validate(token).is_ok() {
            bail!("clear_due_token '{token}' is a valid date and cannot be reserved");
        }
        Ok(())
    }
}

/// Defaults for `ls`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ListConfig {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

impl ListConfig {
    /// Query applied when `ls` is called without filters.
    pub fn default_query(&self) -> Result<TaskQuery> {
        let query = TaskFilterBuilder::new()
            .with_status(self.status.as_deref())
            .and_then(|builder| builder.with_priority(self.priority.as_deref()))
            .map_err(|err| anyhow::anyhow!(err.describe_user_facing()))?
            .build();
        Ok(query)
    }
}
