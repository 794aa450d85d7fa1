//! Account commands - one-shot versions of the dashboard actions
//!
//! Each command logs in, runs one action through the same session state
//! machine as the interactive ATM, and exits.

use anyhow::{anyhow, Result};
use atm_core::{Command, EntryPoint, Error, LogEvent, Notice, Session};
use dialoguer::Confirm;

use super::{get_context, get_logger, log_event, read_pin};
use crate::output;

/// Log in to an existing account. Unknown PINs are not created here.
fn login(session: &mut Session, pin: String) -> Result<()> {
    match session.handle(Command::SubmitPin(pin))? {
        Notice::LoggedIn { .. } => Ok(()),
        _ => {
            session.handle(Command::Confirm(false))?;
            Err(anyhow!("{}. Create one with 'atm new'.", Error::NotFound))
        }
    }
}

/// Run `action` against the account for `pin`, then report and log the outcome
fn with_account<F>(name: &str, pin: Option<String>, json: bool, action: F) -> Result<()>
where
    F: FnOnce(&mut Session) -> Result<Notice>,
{
    let logger = get_logger(EntryPoint::Cli);
    let ctx = get_context()?;
    let (mut session, config) = ctx.into_session();

    let pin = read_pin(pin, "PIN")?;
    let result = login(&mut session, pin).and_then(|_| action(&mut session));

    match result {
        Ok(notice) => {
            log_event(&logger, LogEvent::new("command_executed").with_command(name));
            if json {
                println!("{}", serde_json::to_string_pretty(&notice)?);
            } else {
                output::notice(&notice, &config.currency_symbol);
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(name)
                    .with_error(e.to_string()),
            );
            Err(e)
        }
    }
}

pub fn run_new(pin: Option<String>, json: bool) -> Result<()> {
    let logger = get_logger(EntryPoint::Cli);
    let ctx = get_context()?;
    let (mut session, _) = ctx.into_session();

    let pin = read_pin(pin, "New 4-digit PIN")?;
    let result = session
        .handle(Command::SubmitPin(pin))
        .and_then(|notice| match notice {
            Notice::CreatePrompt { .. } => session.handle(Command::Confirm(true)),
            _ => Err(Error::PinInUse),
        });

    match result {
        Ok(notice) => {
            log_event(&logger, LogEvent::new("account_created").with_command("new"));
            if json {
                println!("{}", serde_json::to_string_pretty(&notice)?);
            } else {
                output::success("New account created!");
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command("new")
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
    }
}

pub fn run_balance(pin: Option<String>, json: bool) -> Result<()> {
    with_account("balance", pin, json, |session| {
        Ok(session.handle(Command::CheckBalance)?)
    })
}

pub fn run_deposit(amount: String, pin: Option<String>, json: bool) -> Result<()> {
    with_account("deposit", pin, json, |session| {
        Ok(session.handle(Command::Deposit(amount))?)
    })
}

pub fn run_withdraw(amount: String, pin: Option<String>, json: bool) -> Result<()> {
    with_account("withdraw", pin, json, |session| {
        Ok(session.handle(Command::Withdraw(amount))?)
    })
}

pub fn run_history(pin: Option<String>, json: bool) -> Result<()> {
    with_account("history", pin, json, |session| {
        Ok(session.handle(Command::ShowHistory)?)
    })
}

pub fn run_change_pin(new_pin: String, pin: Option<String>, json: bool) -> Result<()> {
    with_account("change_pin", pin, json, |session| {
        Ok(session.handle(Command::ChangePin(new_pin))?)
    })
}

pub fn run_delete(pin: Option<String>, force: bool) -> Result<()> {
    with_account("delete", pin, false, |session| {
        session.handle(Command::DeleteAccount)?;
        let confirmed = force
            || Confirm::new()
                .with_prompt("Are you sure you want to delete your account?")
                .default(false)
                .interact()?;
        Ok(session.handle(Command::Confirm(confirmed))?)
    })
}
