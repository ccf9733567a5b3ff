mod agent;
mod cli;
mod db;
mod error;
mod fmt;
mod llm;
mod models;
mod query;
mod seed;
mod settings;
mod tools;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Init { data_dir, seed }) => cli::init::run(data_dir, seed),
        Some(Commands::Store) => cli::store::run(),
        Some(Commands::Analyze) => cli::analyze::run(),
        Some(Commands::Habits) => cli::habits::run(),
        Some(Commands::Status) => cli::status::run(),
        None => cli::run_menu(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
