//! Backup command - manage data file backups

use anyhow::Result;
use atm_core::services::BackupService;
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dialoguer::Confirm;

use super::get_config;

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Create a new backup
    Create {
        /// Maximum number of backups to keep (defaults to the configured value)
        #[arg(long, short = 'm')]
        max_backups: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available backups
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore the data file from a backup
    Restore {
        /// Backup name to restore
        name: String,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear all backups
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn confirm(prompt: String) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

pub fn run(command: BackupCommands) -> Result<()> {
    let (atm_dir, config) = get_config()?;
    let data_path = config.data_path(&atm_dir);
    let backup_service = BackupService::new(atm_dir, data_path);

    match command {
        BackupCommands::Create { max_backups, json } => {
            let result = backup_service.create(Some(max_backups.unwrap_or(config.max_backups)))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", "Backup created".green());
                println!("  Name: {}", result.name);
                println!("  Size: {}", result.size_display());
            }
        }
        BackupCommands::List { json } => {
            let backups = backup_service.list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&backups)?);
                return Ok(());
            }

            if backups.is_empty() {
                println!("No backups found.");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Name", "Created", "Size"]);

            for backup in backups {
                let size = backup.size_display();
                table.add_row(vec![
                    backup.name,
                    backup.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    size,
                ]);
            }

            println!("{}", table);
        }
        BackupCommands::Restore { name, force, json } => {
            if !force && !json && !confirm(format!("Restore accounts from backup '{}'?", name))? {
                println!("Cancelled.");
                return Ok(());
            }
            // Fails with a lock error while a session has the data file open
            backup_service.restore(&name)?;
            if json {
                println!("{}", serde_json::json!({ "restored": name }));
            } else {
                println!("Accounts restored from backup: {}", name);
            }
        }
        BackupCommands::Clear { force, json } => {
            if !force && !json && !confirm("Delete all backups?".to_string())? {
                println!("Cancelled.");
                return Ok(());
            }
            let result = backup_service.clear()?;
            if json {
                println!("{}", serde_json::json!({ "deleted": result.deleted }));
            } else {
                println!("Deleted {} backup(s)", result.deleted);
            }
        }
    }

    Ok(())
}
