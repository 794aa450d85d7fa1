//! Session command - the interactive ATM

use anyhow::Result;
use atm_core::{Command, EntryPoint, LogEvent, LoggingService, Screen, Session};
use colored::Colorize;
use dialoguer::{Confirm, Input, Password, Select};

use super::{get_context, get_logger, log_event};
use crate::output;

const MENU: &[&str] = &[
    "Check Balance",
    "Deposit Money",
    "Withdraw Money",
    "Transaction History",
    "Change PIN",
    "Delete Account",
    "Logout",
];

pub fn run() -> Result<()> {
    if atty::isnt(atty::Stream::Stdin) {
        anyhow::bail!("The interactive session needs a terminal. Use the one-shot commands (atm --help) instead.");
    }

    let ctx = get_context()?;
    let logger = get_logger(EntryPoint::Session);
    log_event(&logger, LogEvent::new("session_started"));

    let (mut session, config) = ctx.into_session();
    let symbol = config.currency_symbol;

    loop {
        let command = match session.screen().clone() {
            Screen::LoggedOut => {
                println!();
                println!("{}", "Welcome to ATM".bold());
                let input = Password::new()
                    .with_prompt("Enter your 4-digit PIN (empty to quit)")
                    .allow_empty_password(true)
                    .interact()?;
                if input.is_empty() {
                    break;
                }
                Command::SubmitPin(input)
            }
            Screen::ConfirmCreate(_) => Command::Confirm(
                Confirm::new()
                    .with_prompt("PIN not found. Create new account?")
                    .default(false)
                    .interact()?,
            ),
            Screen::Dashboard(pin) => {
                println!();
                let choice = Select::new()
                    .with_prompt(format!("User {}", pin))
                    .items(MENU)
                    .default(0)
                    .interact_opt()?;
                match dashboard_command(choice)? {
                    Some(command) => command,
                    None => continue,
                }
            }
            Screen::ConfirmDelete(_) => Command::Confirm(
                Confirm::new()
                    .with_prompt("Are you sure you want to delete your account?")
                    .default(false)
                    .interact()?,
            ),
        };

        step(&mut session, command, &symbol, &logger)?;
    }

    log_event(&logger, LogEvent::new("session_ended"));
    Ok(())
}

/// Turn a menu choice into a command, asking for any input it needs.
/// Escape on the menu logs out.
fn dashboard_command(choice: Option<usize>) -> Result<Option<Command>> {
    let command = match choice {
        Some(0) => Command::CheckBalance,
        Some(1) => Command::Deposit(ask("Enter amount to deposit")?),
        Some(2) => Command::Withdraw(ask("Enter amount to withdraw")?),
        Some(3) => Command::ShowHistory,
        Some(4) => Command::ChangePin(
            Password::new()
                .with_prompt("Enter new 4-digit PIN")
                .allow_empty_password(true)
                .interact()?,
        ),
        Some(5) => Command::DeleteAccount,
        Some(6) | None => Command::Logout,
        Some(_) => return Ok(None),
    };
    Ok(Some(command))
}

fn ask(prompt: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}

/// Apply one command. Input errors are shown and the session carries on;
/// storage errors end it.
fn step(
    session: &mut Session,
    command: Command,
    symbol: &str,
    logger: &Option<LoggingService>,
) -> Result<()> {
    let name = command.name();
    let screen = session.screen().name();

    match session.handle(command) {
        Ok(notice) => {
            output::notice(&notice, symbol);
            log_event(
                logger,
                LogEvent::new(format!("{}_completed", name))
                    .with_command(name)
                    .with_screen(screen),
            );
            Ok(())
        }
        Err(e) if e.is_recoverable() => {
            output::warning(&e.to_string());
            log_event(
                logger,
                LogEvent::new(format!("{}_rejected", name))
                    .with_command(name)
                    .with_screen(screen)
                    .with_error(e.to_string()),
            );
            Ok(())
        }
        Err(e) => {
            log_event(
                logger,
                LogEvent::new(format!("{}_failed", name))
                    .with_command(name)
                    .with_screen(screen)
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
    }
}
