//! Configuration management
//!
//! Settings live in `settings.json` inside the ATM directory:
//! ```json
//! {
//!   "app": { "dataFile": "users.json", "currencySymbol": "₹", "maxBackups": 10 }
//! }
//! ```
//! Fields this crate does not know about are preserved when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default name of the account data file
pub const DEFAULT_DATA_FILE: &str = "users.json";
/// Default currency symbol shown next to amounts
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
/// Default number of backups kept by `backup create`
pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// Environment variable overriding the data file location
pub const DATA_FILE_ENV: &str = "ATM_DATA_FILE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_backups: Option<usize>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// ATM configuration (resolved view of settings + environment)
#[derive(Debug, Clone)]
pub struct Config {
    /// Data file as configured: absolute, or relative to the ATM directory
    pub data_file: String,
    pub currency_symbol: String,
    pub max_backups: usize,
    /// `ATM_DATA_FILE` value in effect at load time, never written back
    data_file_override: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            max_backups: DEFAULT_MAX_BACKUPS,
            data_file_override: None,
        }
    }
}

impl Config {
    /// Load config from the ATM directory
    ///
    /// A missing or malformed settings file yields the defaults. The data
    /// file can be overridden with `ATM_DATA_FILE`.
    pub fn load(atm_dir: &Path) -> Result<Self> {
        let data_file_override = std::env::var(DATA_FILE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self::load_with_override(atm_dir, data_file_override)
    }

    fn load_with_override(atm_dir: &Path, data_file_override: Option<String>) -> Result<Self> {
        let raw = Self::read_settings(atm_dir)?;
        let defaults = Self::default();

        let data_file = match &data_file_override {
            Some(path) => path.clone(),
            None => raw.app.data_file.unwrap_or(defaults.data_file),
        };

        Ok(Self {
            data_file,
            currency_symbol: raw.app.currency_symbol.unwrap_or(defaults.currency_symbol),
            max_backups: raw.app.max_backups.unwrap_or(defaults.max_backups),
            data_file_override,
        })
    }

    /// Save config to the ATM directory, keeping unmanaged fields
    ///
    /// A data file that still comes from `ATM_DATA_FILE` leaves the saved
    /// `dataFile` untouched.
    pub fn save(&self, atm_dir: &Path) -> Result<()> {
        let mut settings = Self::read_settings(atm_dir)?;

        if self.data_file_override.as_deref() != Some(self.data_file.as_str()) {
            settings.app.data_file = Some(self.data_file.clone());
        }
        settings.app.currency_symbol = Some(self.currency_symbol.clone());
        settings.app.max_backups = Some(self.max_backups);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(atm_dir.join("settings.json"), content)?;
        Ok(())
    }

    /// Choose the data file explicitly; it is saved even if it matches the
    /// environment override
    pub fn set_data_file(&mut self, data_file: impl Into<String>) {
        self.data_file = data_file.into();
        self.data_file_override = None;
    }

    /// Absolute path of the data file
    pub fn data_path(&self, atm_dir: &Path) -> PathBuf {
        let path = Path::new(&self.data_file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            atm_dir.join(path)
        }
    }

    fn read_settings(atm_dir: &Path) -> Result<SettingsFile> {
        let settings_path = atm_dir.join("settings.json");
        if !settings_path.exists() {
            return Ok(SettingsFile::default());
        }
        let content = std::fs::read_to_string(&settings_path)?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }
}
