//! Output formatting utilities

use atm_core::Notice;
use colored::Colorize;
use rust_decimal::Decimal;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Format an amount with the configured currency symbol
pub fn money(symbol: &str, amount: Decimal) -> String {
    format!("{}{}", symbol, amount)
}

/// Show the user what a session command did
pub fn notice(notice: &Notice, symbol: &str) {
    match notice {
        Notice::LoggedIn { pin } => success(&format!("Welcome, User {}", pin)),
        // Followed by a confirmation prompt that says it all
        Notice::CreatePrompt { .. } | Notice::DeletePrompt => {}
        Notice::AccountCreated { pin } => success(&format!("New account created! Welcome, User {}", pin)),
        Notice::Balance { balance } => {
            info(&format!("Your current balance is {}", money(symbol, *balance)))
        }
        Notice::Deposited { amount, .. } => {
            success(&format!("{} deposited successfully!", money(symbol, *amount)))
        }
        Notice::Withdrew { amount, .. } => {
            success(&format!("{} withdrawn successfully!", money(symbol, *amount)))
        }
        Notice::History { entries } => {
            if entries.is_empty() {
                info("No transactions yet.");
            } else {
                println!("{}", "Transaction History".bold());
                for (i, entry) in entries.iter().enumerate() {
                    println!("  {:>3}. {}", i + 1, entry);
                }
            }
        }
        Notice::PinChanged { .. } => success("Your PIN has been changed successfully."),
        Notice::AccountDeleted => success("Your account has been deleted."),
        Notice::LoggedOut => println!("{}", "Logged out.".dimmed()),
        Notice::Cancelled => println!("{}", "Cancelled".dimmed()),
    }
}
