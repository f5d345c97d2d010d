//! Configuration for the roster backend, read from a YAML file.

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::DEFAULT_ROSTER_KEY;

/// The department labels offered by the current student form
pub const DEFAULT_DEPARTMENTS: [&str; 4] = ["CADD", "LIVE WIRE", "DREAM ZONE", "SYNERGY"];

const DEFAULT_DATA_DIRECTORY_NAME: &str = "Lab Roster";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub storage: StorageConfig,
    pub form: FormConfig,
    /// Seed a small demo roster the first time the app runs
    pub seed_demo_roster: bool,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            form: FormConfig::default(),
            seed_demo_roster: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where the database file lives; the platform data directory when unset
    pub data_directory: Option<PathBuf>,
    pub database_file: String,
    pub roster_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            database_file: "roster.db".to_string(),
            roster_key: DEFAULT_ROSTER_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn database_path(&self) -> PathBuf {
        let directory = self
            .data_directory
            .clone()
            .unwrap_or_else(default_data_directory);
        directory.join(&self.database_file)
    }
}

/// `~/.local/share/Lab Roster` and the platform equivalents, or the working
/// directory when the platform has no data directory
pub fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(DEFAULT_DATA_DIRECTORY_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIRECTORY_NAME))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub department_policy: DepartmentPolicy,
    pub require_age: bool,
    pub require_course: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            department_policy: DepartmentPolicy::default(),
            require_age: false,
            require_course: false,
        }
    }
}

/// Whether the department field is a closed list or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DepartmentPolicy {
    Fixed { departments: Vec<String> },
    FreeText,
}

impl Default for DepartmentPolicy {
    fn default() -> Self {
        DepartmentPolicy::Fixed {
            departments: DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl DepartmentPolicy {
    /// Resolve typed input to the stored department label.
    ///
    /// Fixed lists match case-insensitively and return the configured spelling.
    pub fn resolve(&self, input: &str) -> Option<String> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        match self {
            DepartmentPolicy::FreeText => Some(input.to_string()),
            DepartmentPolicy::Fixed { departments } => departments
                .iter()
                .find(|d| d.eq_ignore_ascii_case(input))
                .cloned(),
        }
    }

    /// Options to offer in a picker; empty for free text
    pub fn options(&self) -> &[String] {
        match self {
            DepartmentPolicy::Fixed { departments } => departments,
            DepartmentPolicy::FreeText => &[],
        }
    }
}

impl RosterConfig {
    /// Load configuration from a YAML file; a missing file gives the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&yaml_content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    /// Write configuration as YAML, atomically via a temp file
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Configuration rooted at an explicit data directory
    pub fn with_data_directory(directory: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.storage.data_directory = Some(directory.into());
        config
    }
}
