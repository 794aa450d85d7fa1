//! Status command - show a summary of the account store

use anyhow::Result;
use atm_core::domain::format_size;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::get_context;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status_service.get_status(&ctx.store);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "ATM Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Accounts", &status.total_accounts.to_string()]);
    table.add_row(vec!["Accounts with activity", &status.accounts_with_history.to_string()]);
    table.add_row(vec!["Transactions", &status.total_transactions.to_string()]);

    println!("{}", table);
    println!();

    if status.data_file_exists {
        println!(
            "Data file: {} ({})",
            status.data_file,
            format_size(status.data_file_size_bytes)
        );
    } else {
        println!("Data file: {} {}", status.data_file, "(not created yet)".dimmed());
    }

    Ok(())
}
