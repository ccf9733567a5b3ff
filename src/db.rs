use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

/// Schema kept bit-exact so existing transactions.db files stay compatible.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    category TEXT NOT NULL,
    amount REAL NOT NULL,
    description TEXT,
    expense BOOLEAN NOT NULL
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_transactions_table() {
        let (_dir, conn) = test_db();
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='transactions'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='transactions'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_transactions_table_columns() {
        let (_dir, conn) = test_db();
        let cols: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('transactions')")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            cols,
            vec!["id", "date", "category", "amount", "description", "expense"]
        );
    }

    #[test]
    fn test_id_autoincrements() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO transactions (date, category, amount, description, expense) \
             VALUES ('2025-01-01', 'General', 10.0, 'first', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO transactions (date, category, amount, description, expense) \
             VALUES ('2025-01-02', 'General', 20.0, 'second', 1)",
            [],
        )
        .unwrap();
        let max_id: i64 = conn
            .query_row("SELECT max(id) FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(max_id, 2);
    }
}
