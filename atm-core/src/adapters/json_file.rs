//! JSON file repository
//!
//! The data file is a single JSON object mapping PIN strings to account
//! records, indented with four spaces:
//!
//! ```json
//! {
//!     "1234": {
//!         "balance": 300,
//!         "history": ["Deposited 500", "Withdrew 200"]
//!     }
//! }
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::domain::AccountMap;
use crate::ports::AccountRepository;

/// Repository backed by one JSON file
///
/// Holds an exclusive lock on `<data file>.lock` for its whole lifetime so two
/// sessions can never rewrite the same file concurrently. The lock is released
/// when the repository is dropped.
pub struct JsonFileRepository {
    path: PathBuf,
    _lock: File,
}

impl JsonFileRepository {
    /// Open the repository, failing with `Error::Locked` if another session
    /// already holds the data file.
    pub fn open(path: &Path) -> Result<Self> {
        let lock_path = Self::lock_path(path);
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if lock.try_lock_exclusive().is_err() {
            return Err(Error::Locked(path.display().to_string()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            _lock: lock,
        })
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    fn to_pretty_json(accounts: &AccountMap) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        accounts.serialize(&mut ser)?;
        Ok(buf)
    }
}

impl AccountRepository for JsonFileRepository {
    fn load(&self) -> Result<AccountMap> {
        if !self.path.exists() {
            return Ok(AccountMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let accounts: AccountMap = serde_json::from_str(&content)?;

        for (pin, account) in &accounts {
            account
                .validate()
                .map_err(|e| Error::validation(format!("account {}: {}", pin, e)))?;
        }

        Ok(accounts)
    }

    fn save(&self, accounts: &AccountMap) -> Result<()> {
        let content = Self::to_pretty_json(accounts)?;

        // Write next to the target so the rename stays on one filesystem
        let mut tmp = NamedTempFile::new_in(self.parent_dir())?;
        tmp.write_all(&content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
