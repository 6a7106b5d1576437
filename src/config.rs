// ⚙️ Configuration - TOML file + environment override
//
// ~/.config/expense-tracker/config.toml (platform equivalent via `dirs`).
// Every field is optional; a missing file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "expense-tracker";
pub const CONFIG_FILE: &str = "config.toml";
pub const DB_ENV_VAR: &str = "EXPENSE_TRACKER_DB";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding the expense blob
    pub database_path: PathBuf,

    /// Where PDF/CSV exports are written
    pub export_dir: PathBuf,

    /// Log directory for TUI sessions
    pub log_dir: PathBuf,

    /// Shown in the UI and CLI output
    pub currency_symbol: String,

    /// Used in the PDF report (built-in PDF fonts are Latin-1 only)
    pub currency_code: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Config {
            database_path: data_dir.join("expenses.db"),
            export_dir: PathBuf::from("."),
            log_dir: data_dir.join("logs"),
            currency_symbol: "₹".to_string(),
            currency_code: "INR".to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
}

impl Config {
    /// Load from `path`, or the default location when `None`.
    /// A missing file yields defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path(),
        };

        let mut config = match path {
            Some(ref p) if p.exists() => Self::from_file(p)?,
            _ => Config::default(),
        };

        if let Ok(db) = std::env::var(DB_ENV_VAR) {
            if !db.trim().is_empty() {
                config.database_path = PathBuf::from(db);
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
