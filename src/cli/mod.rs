pub mod analyze;
pub mod habits;
pub mod init;
pub mod status;
pub mod store;

use std::io::Write;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::error::Result;

#[derive(Parser)]
#[command(
    name = "penny",
    about = "Conversational personal-finance assistant for the terminal."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the transactions database (optionally with demo data).
    Init {
        /// Path for Penny data (default: ~/Documents/penny)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Insert 100 random demo transactions
        #[arg(long)]
        seed: bool,
    },
    /// Chat to record income/expense transactions.
    Store,
    /// Chat to analyze transactions (read-only queries).
    Analyze,
    /// Chat about consumption habits and preferences.
    Habits,
    /// Show current database and summary statistics.
    Status,
}

/// Read one trimmed line from stdin. `None` on EOF.
pub(crate) fn prompt(label: &str) -> Option<String> {
    print!("{label}");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    match std::io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

/// Numbered menu loop; the process only exits on choice 4 or EOF.
pub fn run_menu() -> Result<()> {
    loop {
        println!();
        println!("{}", "Personal Finance Management".bold());
        println!("1. Create/reset database");
        println!("2. Store transactions");
        println!("3. Analyze transactions");
        println!("4. Exit");
        println!("5. Consumption habits");

        let choice = match prompt("Enter your choice (1-5): ") {
            Some(c) => c,
            None => break,
        };

        let result = match choice.as_str() {
            "1" => init::run_interactive(),
            "2" => store::run(),
            "3" => analyze::run(),
            "4" => {
                println!("Thank you for using Penny. Goodbye!");
                break;
            }
            "5" => habits::run(),
            _ => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };

        // A failed action returns to the menu instead of killing the loop.
        if let Err(e) = result {
            eprintln!("{} {e}", "Error:".red());
        }
    }
    Ok(())
}
