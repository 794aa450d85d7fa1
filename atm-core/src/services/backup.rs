//! Backup service - ZIP archives of the account data file and settings

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::adapters::json_file::JsonFileRepository;
use crate::domain::BackupMetadata;

/// Archive entry holding the account data file
const DATA_ENTRY: &str = "accounts.json";
/// Archive entry holding the settings file
const SETTINGS_ENTRY: &str = "settings.json";
const BACKUP_PREFIX: &str = "atm-";

pub struct BackupService {
    atm_dir: PathBuf,
    data_path: PathBuf,
}

impl BackupService {
    pub fn new(atm_dir: PathBuf, data_path: PathBuf) -> Self {
        Self { atm_dir, data_path }
    }

    fn backups_dir(&self) -> PathBuf {
        self.atm_dir.join("backups")
    }

    /// Archive the data file and settings, then prune to `max_backups`
    pub fn create(&self, max_backups: Option<usize>) -> Result<BackupMetadata> {
        if !self.data_path.exists() {
            anyhow::bail!("No account data to back up yet");
        }

        let backup_name = Self::timestamped_name("");
        let backup_path = self.write_archive(&backup_name, true)?;
        let size_bytes = fs::metadata(&backup_path)?.len();

        if let Some(max) = max_backups {
            self.apply_retention(max)?;
        }

        Ok(BackupMetadata::new(backup_name, Utc::now(), size_bytes))
    }

    /// All backups, newest first
    pub fn list(&self) -> Result<Vec<BackupMetadata>> {
        let backups_dir = self.backups_dir();
        if !backups_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("zip") {
                continue;
            }

            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string();
            if !name.starts_with(BACKUP_PREFIX) {
                continue;
            }

            let size_bytes = fs::metadata(&path)?.len();
            let created_at = Self::parse_backup_time(&name);
            backups.push(BackupMetadata::new(name, created_at, size_bytes));
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.name.cmp(&a.name)));
        Ok(backups)
    }

    /// Restore a backup over the current data file
    ///
    /// The current state is archived first as `atm-pre-restore-*.zip`. Fails
    /// if a session currently holds the data file.
    pub fn restore(&self, backup_name: &str) -> Result<()> {
        if !Self::is_plain_name(backup_name) {
            anyhow::bail!("Invalid backup name: {}", backup_name);
        }
        let backup_path = self.backups_dir().join(backup_name);
        if !backup_path.exists() {
            anyhow::bail!("Backup not found: {}", backup_name);
        }

        let _guard = JsonFileRepository::open(&self.data_path)
            .context("Cannot restore while the data file is in use")?;

        if self.data_path.exists() {
            let pre_restore = Self::timestamped_name("pre-restore-");
            self.write_archive(&pre_restore, false)?;
        }

        let file = File::open(&backup_path)?;
        let mut archive = ZipArchive::new(file)?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let target = match entry.name() {
                DATA_ENTRY => self.data_path.clone(),
                SETTINGS_ENTRY => self.atm_dir.join(SETTINGS_ENTRY),
                _ => continue,
            };
            Self::replace_file(&target, &mut entry)?;
        }

        Ok(())
    }

    /// Backup names are bare file names inside the backups directory
    fn is_plain_name(name: &str) -> bool {
        !name.is_empty()
            && !name.contains(['/', '\\'])
            && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
    }

    /// Write `content` to a temp file beside `target`, then rename it over
    fn replace_file(target: &Path, content: &mut impl Read) -> Result<()> {
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        std::io::copy(content, &mut tmp)?;
        tmp.as_file().sync_all()?;
        tmp.persist(target)
            .with_context(|| format!("Failed to replace {}", target.display()))?;
        Ok(())
    }

    /// Delete every backup
    pub fn clear(&self) -> Result<ClearResult> {
        let backups = self.list()?;
        for backup in &backups {
            fs::remove_file(self.backups_dir().join(&backup.name))?;
        }
        Ok(ClearResult {
            deleted: backups.len(),
        })
    }

    fn write_archive(&self, name: &str, include_settings: bool) -> Result<PathBuf> {
        let backups_dir = self.backups_dir();
        fs::create_dir_all(&backups_dir)?;
        let path = backups_dir.join(name);

        let file = File::create(&path).context("Failed to create backup file")?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        Self::add_file(&mut zip, options, DATA_ENTRY, &self.data_path)?;

        let settings_path = self.atm_dir.join(SETTINGS_ENTRY);
        if include_settings && settings_path.exists() {
            Self::add_file(&mut zip, options, SETTINGS_ENTRY, &settings_path)?;
        }

        zip.finish()?;
        Ok(path)
    }

    fn add_file(
        zip: &mut ZipWriter<File>,
        options: SimpleFileOptions,
        entry: &str,
        path: &Path,
    ) -> Result<()> {
        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;
        zip.start_file(entry, options)?;
        zip.write_all(&buffer)?;
        Ok(())
    }

    fn timestamped_name(tag: &str) -> String {
        let now = Utc::now();
        format!(
            "{}{}{}-{:06}.zip",
            BACKUP_PREFIX,
            tag,
            now.format("%Y-%m-%dT%H-%M-%S"),
            now.timestamp_subsec_micros()
        )
    }

    /// Creation time from "atm-[pre-restore-]TIMESTAMP.zip"
    fn parse_backup_time(backup_name: &str) -> chrono::DateTime<Utc> {
        let ts = backup_name
            .strip_prefix(BACKUP_PREFIX)
            .map(|s| s.strip_prefix("pre-restore-").unwrap_or(s))
            .and_then(|s| s.strip_suffix(".zip"));

        ts.and_then(|ts| {
            chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H-%M-%S-%f")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H-%M-%S"))
                .ok()
        })
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
    }

    fn apply_retention(&self, max_backups: usize) -> Result<()> {
        let mut backups = self.list()?;
        while backups.len() > max_backups {
            if let Some(oldest) = backups.pop() {
                fs::remove_file(self.backups_dir().join(&oldest.name))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ClearResult {
    pub deleted: usize,
}
