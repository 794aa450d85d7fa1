//! ATM CLI - an ATM simulator in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{account, backup, config, doctor, logs, session, status};

/// ATM - PIN-based accounts in your terminal
#[derive(Parser)]
#[command(name = "atm", version, about, long_about = None)]
struct Cli {
    /// Runs the interactive session when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive ATM session
    Session,

    /// Create a new account
    New {
        /// PIN for the new account (prompted if omitted)
        #[arg(long)]
        pin: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the balance of an account
    Balance {
        /// Account PIN (prompted if omitted)
        #[arg(long)]
        pin: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Deposit money into an account
    Deposit {
        /// Amount to deposit
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Account PIN (prompted if omitted)
        #[arg(long)]
        pin: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw money from an account
    Withdraw {
        /// Amount to withdraw
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Account PIN (prompted if omitted)
        #[arg(long)]
        pin: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the transaction history of an account
    History {
        /// Account PIN (prompted if omitted)
        #[arg(long)]
        pin: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change the PIN of an account
    ChangePin {
        /// New 4-digit PIN
        new_pin: String,
        /// Current PIN (prompted if omitted)
        #[arg(long)]
        pin: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an account permanently
    Delete {
        /// Account PIN (prompted if omitted)
        #[arg(long)]
        pin: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Show a summary of the account store
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run health checks on the data file
    Doctor {
        /// Show verbose output
        #[arg(long, short)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage backups
    Backup {
        #[command(subcommand)]
        command: backup::BackupCommands,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None | Some(Commands::Session) => session::run(),
        Some(Commands::New { pin, json }) => account::run_new(pin, json),
        Some(Commands::Balance { pin, json }) => account::run_balance(pin, json),
        Some(Commands::Deposit { amount, pin, json }) => account::run_deposit(amount, pin, json),
        Some(Commands::Withdraw { amount, pin, json }) => account::run_withdraw(amount, pin, json),
        Some(Commands::History { pin, json }) => account::run_history(pin, json),
        Some(Commands::ChangePin { new_pin, pin, json }) => {
            account::run_change_pin(new_pin, pin, json)
        }
        Some(Commands::Delete { pin, force }) => account::run_delete(pin, force),
        Some(Commands::Status { json }) => status::run(json),
        Some(Commands::Doctor { verbose, json }) => doctor::run(verbose, json),
        Some(Commands::Backup { command }) => backup::run(command),
        Some(Commands::Logs { command }) => logs::run(command),
        Some(Commands::Config { command }) => config::run(command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_amounts_reach_the_session() {
        let cli = Cli::try_parse_from(["atm", "withdraw", "--pin", "1234", "-5"]).unwrap();
        match cli.command {
            Some(Commands::Withdraw { amount, pin, .. }) => {
                assert_eq!(amount, "-5");
                assert_eq!(pin.as_deref(), Some("1234"));
            }
            _ => panic!("expected withdraw"),
        }

        let cli = Cli::try_parse_from(["atm", "deposit", "-0.5"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Deposit { amount, .. }) if amount == "-0.5"));
    }
}
