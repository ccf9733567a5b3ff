use std::path::PathBuf;

use crate::cli::prompt;
use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::seed::{seed_random_transactions, SEED_COUNT};
use crate::settings::{load_settings, save_settings, DB_FILENAME};

pub fn run(data_dir: Option<String>, seed: bool) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;

    let conn = get_connection(&resolved.join(DB_FILENAME))?;
    init_db(&conn)?;
    println!("Database ready at {}", resolved.join(DB_FILENAME).display());

    if seed {
        let inserted = seed_random_transactions(&conn, SEED_COUNT)?;
        println!("{inserted} random transactions have been added to the database.");
    }

    Ok(())
}

/// Menu flow: same as `run`, but asks whether to seed demo data.
pub fn run_interactive() -> Result<()> {
    let seed = matches!(
        prompt("Seed 100 random demo transactions? [y/N]: ").as_deref(),
        Some("y") | Some("Y") | Some("yes")
    );
    run(None, seed)
}

fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
