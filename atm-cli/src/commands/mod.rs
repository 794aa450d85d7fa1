//! CLI command implementations

pub mod account;
pub mod backup;
pub mod config;
pub mod doctor;
pub mod logs;
pub mod session;
pub mod status;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use atm_core::config::Config;
use atm_core::{AtmContext, EntryPoint, LogEvent, LoggingService};
use dialoguer::Password;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger(entry_point: EntryPoint) -> Option<LoggingService> {
    let atm_dir = get_atm_dir().ok()?;
    std::fs::create_dir_all(&atm_dir).ok()?;
    LoggingService::new(&atm_dir, entry_point, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the ATM directory from environment or default
pub fn get_atm_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ATM_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".atm"))
        .ok_or_else(|| anyhow!("Could not find home directory; set ATM_DIR"))
}

/// Load config without touching the data file
pub fn get_config() -> Result<(PathBuf, Config)> {
    let atm_dir = get_atm_dir()?;
    std::fs::create_dir_all(&atm_dir)
        .with_context(|| format!("Failed to create ATM directory: {:?}", atm_dir))?;
    let config = Config::load(&atm_dir)?;
    Ok((atm_dir, config))
}

/// Open the data file and load the account store
pub fn get_context() -> Result<AtmContext> {
    let (atm_dir, _) = get_config()?;
    AtmContext::new(&atm_dir).context("Failed to open the account store")
}

/// Use the given PIN or ask for it without echoing
pub fn read_pin(pin: Option<String>, prompt: &str) -> Result<String> {
    match pin {
        Some(p) => Ok(p),
        None => Ok(Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?),
    }
}
