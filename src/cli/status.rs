use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::fmt::money;
use crate::settings::db_path;

pub fn run() -> Result<()> {
    let db = db_path();
    if !db.exists() {
        println!("No database found. Run `penny init` or menu option 1 first.");
        return Ok(());
    }

    let conn = get_connection(&db)?;
    init_db(&conn)?;

    let total: i64 = conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
    let income: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE expense = 0",
        [],
        |r| r.get(0),
    )?;
    let spent: f64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE expense = 1",
        [],
        |r| r.get(0),
    )?;

    println!("Database:     {}", db.display());
    println!("Transactions: {total}");
    println!("Income:       {}", money(income));
    println!("Spent:        {}", money(spent));

    let mut stmt = conn.prepare(
        "SELECT category, count(*), SUM(amount) FROM transactions \
         GROUP BY category ORDER BY SUM(amount) DESC",
    )?;
    let rows: Vec<(String, i64, f64)> = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if !rows.is_empty() {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Category", "Count", "Total"]);
        for (category, count, sum) in rows {
            table.add_row(vec![category, count.to_string(), money(sum)]);
        }
        println!("{table}");
    }

    Ok(())
}
