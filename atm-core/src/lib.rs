//! ATM Core - account store and session logic for the ATM simulator
//!
//! Laid out in hexagonal style:
//!
//! - **domain**: PINs, account records, amount parsing, errors
//! - **ports**: the `AccountRepository` persistence trait
//! - **adapters**: JSON file and in-memory repositories
//! - **services**: the account store, the session state machine, and
//!   operator services (logging, backups, status, doctor)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adapters::json_file::JsonFileRepository;
use config::Config;
use services::StatusService;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{Account, AccountMap, BackupMetadata, Pin};
pub use services::{
    AccountStore, Command, EntryPoint, LogEvent, LoggingService, Notice, Screen, Session,
};

/// Main context for ATM operations
///
/// Opens (and locks) the data file and loads the store. Drop the context to
/// release the data file. Backups and health checks work on the file itself
/// and are built from the config without a context.
pub struct AtmContext {
    pub config: Config,
    pub atm_dir: PathBuf,
    pub data_path: PathBuf,
    pub store: AccountStore,
    pub status_service: StatusService,
}

impl AtmContext {
    pub fn new(atm_dir: &Path) -> anyhow::Result<Self> {
        let config = Config::load(atm_dir)?;
        let data_path = config.data_path(atm_dir);

        let repository = Arc::new(JsonFileRepository::open(&data_path)?);
        let store = AccountStore::load(repository)?;

        Ok(Self {
            status_service: StatusService::new(data_path.clone()),
            config,
            atm_dir: atm_dir.to_path_buf(),
            data_path,
            store,
        })
    }

    /// Start an interactive session over the loaded store
    pub fn into_session(self) -> (Session, Config) {
        (Session::new(self.store), self.config)
    }
}
