//! Sovereignty configuration.
//!
//! Config file: ~/.config/sovereign/config.toml or /etc/sovereign/config.toml.
//! Carries the database location, the default path, and the tunables for
//! trend analysis and insight classification. Loaded once at startup and
//! handed to the core by reference; there is no process-wide singleton.

use crate::insight::InsightThresholds;
use crate::trends::TrendConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SovereignConfig {
    /// Database file. Defaults to ~/.local/share/sovereign/sovereign.db.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Path applied when a record does not specify one.
    #[serde(default = "default_path_id")]
    pub default_path: String,

    /// Optional TOML file with extra/overriding path definitions.
    #[serde(default)]
    pub paths_file: Option<PathBuf>,

    #[serde(default)]
    pub trend: TrendConfig,

    #[serde(default)]
    pub thresholds: InsightThresholds,
}

fn default_path_id() -> String {
    "default".to_string()
}

impl Default for SovereignConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            default_path: default_path_id(),
            paths_file: None,
            trend: TrendConfig::default(),
            thresholds: InsightThresholds::default(),
        }
    }
}

impl SovereignConfig {
    /// User config path: ~/.config/sovereign/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("Cannot determine home directory")?;
        Ok(Path::new(&home).join(".config").join("sovereign").join("config.toml"))
    }

    /// System config path: /etc/sovereign/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/sovereign/config.toml")
    }

    /// Load configuration.
    ///
    /// Priority: user config, then system config, then defaults.
    pub fn load() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        Ok(Self::default())
    }

    /// Load from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Save to the user config file.
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let toml_string = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(&path, toml_string).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Resolved database path.
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        let home = std::env::var("HOME").context("Cannot determine home directory")?;
        Ok(Path::new(&home)
            .join(".local")
            .join("share")
            .join("sovereign")
            .join("sovereign.db"))
    }
}
