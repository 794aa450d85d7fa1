//! Config command - show and change settings

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_config;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings
    Set {
        /// Data file, absolute or relative to the ATM directory
        #[arg(long)]
        data_file: Option<String>,
        /// Symbol shown in front of amounts
        #[arg(long)]
        currency_symbol: Option<String>,
        /// Number of backups to keep
        #[arg(long)]
        max_backups: Option<usize>,
    },
}

pub fn run(command: Option<ConfigCommands>) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show { json: false }) {
        ConfigCommands::Show { json } => {
            let (atm_dir, config) = get_config()?;
            let data_path = config.data_path(&atm_dir);

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "atmDir": atm_dir.to_string_lossy(),
                        "dataFile": config.data_file,
                        "dataPath": data_path.to_string_lossy(),
                        "currencySymbol": config.currency_symbol,
                        "maxBackups": config.max_backups,
                    })
                );
                return Ok(());
            }

            println!("{}", "Settings".bold());
            println!("  ATM directory:   {}", atm_dir.display());
            println!("  Data file:       {}", data_path.display());
            println!("  Currency symbol: {}", config.currency_symbol);
            println!("  Max backups:     {}", config.max_backups);
        }
        ConfigCommands::Set {
            data_file,
            currency_symbol,
            max_backups,
        } => {
            if data_file.is_none() && currency_symbol.is_none() && max_backups.is_none() {
                anyhow::bail!("Nothing to set. See 'atm config set --help'.");
            }

            let (atm_dir, mut config) = get_config()?;
            if let Some(data_file) = data_file {
                config.set_data_file(data_file);
            }
            if let Some(symbol) = currency_symbol {
                config.currency_symbol = symbol;
            }
            if let Some(max) = max_backups {
                config.max_backups = max;
            }
            config.save(&atm_dir)?;
            output::success("Settings saved");
        }
    }

    Ok(())
}
