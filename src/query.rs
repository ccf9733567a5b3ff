use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::{json, Value};

use crate::error::{PennyError, Result};

/// Whether a SQL tool may mutate the store. The analysis persona gets
/// `ReadOnly`; the habits persona keeps the unrestricted tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

/// All rows a statement produced, plus the column names for display.
/// An empty SELECT yields `rows: []`, which is distinct from an error.
#[derive(Debug)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Extract the first keyword of a statement, skipping whitespace and
/// `--` / `/* */` comments.
fn first_keyword(sql: &str) -> String {
    let mut rest = sql.trim_start();
    loop {
        if let Some(stripped) = rest.strip_prefix("--") {
            rest = match stripped.find('\n') {
                Some(pos) => stripped[pos + 1..].trim_start(),
                None => "",
            };
        } else if let Some(stripped) = rest.strip_prefix("/*") {
            rest = match stripped.find("*/") {
                Some(pos) => stripped[pos + 2..].trim_start(),
                None => "",
            };
        } else {
            break;
        }
    }
    rest.chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Cheap leading-keyword screen for the analysis persona's read-only
/// contract. A `WITH` lead can still prefix DML, so this is only a first
/// gate; the compiled statement's `readonly()` flag is what decides.
pub fn statement_is_read_only(sql: &str) -> bool {
    matches!(
        first_keyword(sql).as_str(),
        "SELECT" | "WITH" | "EXPLAIN" | "VALUES"
    )
}

/// Execute one SQL statement and fetch all result rows. In `ReadOnly` mode
/// a writing statement is rejected before execution: first by leading
/// keyword, then by `sqlite3_stmt_readonly` on the prepared statement
/// (preparing does not execute anything).
pub fn execute_sql(conn: &Connection, sql: &str, mode: AccessMode) -> Result<QueryResult> {
    if mode == AccessMode::ReadOnly && !statement_is_read_only(sql) {
        return Err(PennyError::ReadOnly(first_keyword(sql)));
    }

    let mut stmt = conn.prepare(sql)?;
    if mode == AccessMode::ReadOnly && !stmt.readonly() {
        return Err(PennyError::ReadOnly(first_keyword(sql)));
    }
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let ncols = columns.len();

    let mut out = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(ncols);
        for i in 0..ncols {
            values.push(match row.get_ref(i)? {
                ValueRef::Null => Value::Null,
                ValueRef::Integer(n) => json!(n),
                ValueRef::Real(f) => json!(f),
                ValueRef::Text(t) => json!(String::from_utf8_lossy(t)),
                ValueRef::Blob(b) => json!(format!("<blob: {} bytes>", b.len())),
            });
        }
        out.push(values);
    }

    Ok(QueryResult {
        columns,
        rows: out,
    })
}
