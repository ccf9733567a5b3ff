use std::path::PathBuf;

use serde_json::{json, Value};

use crate::db::get_connection;
use crate::error::{PennyError, Result};
use crate::fmt::render_rows;
use crate::models::Category;
use crate::query::{execute_sql, AccessMode};

/// Name, description and JSON argument schema surfaced to the model.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// A callable exposed to the assistant. Each invocation opens its own
/// database connection and closes it on return; no state crosses calls.
pub trait Tool {
    fn spec(&self) -> ToolSpec;
    fn call(&self, args: &Value) -> Result<Value>;
}

pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn call(&self, name: &str, args: &Value) -> Result<Value> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.spec().name == name)
            .ok_or_else(|| PennyError::UnknownTool(name.to_string()))?;
        tool.call(args)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| PennyError::ToolArgs(format!("expected string '{key}'")))
}

fn require_f64(args: &Value, key: &str) -> Result<f64> {
    args.get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| PennyError::ToolArgs(format!("expected number '{key}'")))
}

fn require_bool(args: &Value, key: &str) -> Result<bool> {
    args.get(key)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| PennyError::ToolArgs(format!("expected boolean '{key}'")))
}

/// `store_data`: append exactly one transaction row. The category enum in
/// the schema is a hint to the model; this function stores whatever label
/// it is handed.
pub struct StoreTransactionTool {
    db_path: PathBuf,
}

impl StoreTransactionTool {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

impl Tool for StoreTransactionTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "store_data",
            description: "Save an expense/income transaction in the database",
            parameters: json!({
                "type": "object",
                "properties": {
                    "expense": {
                        "type": "boolean",
                        "description": "Whether it's an expense or income"
                    },
                    "date": {
                        "type": "string",
                        "description": "Transaction date, YYYY-MM-DD"
                    },
                    "category": {
                        "type": "string",
                        "enum": Category::labels(),
                        "description": "The category name"
                    },
                    "amount": {
                        "type": "number",
                        "description": "Transaction amount"
                    },
                    "description": {
                        "type": "string",
                        "description": "A short summary about the transaction"
                    }
                },
                "required": ["expense", "date", "category", "amount", "description"]
            }),
        }
    }

    fn call(&self, args: &Value) -> Result<Value> {
        let expense = require_bool(args, "expense")?;
        let date = require_str(args, "date")?;
        let category = require_str(args, "category")?;
        let amount = require_f64(args, "amount")?;
        let description = require_str(args, "description")?;

        let conn = get_connection(&self.db_path)?;
        conn.execute(
            "INSERT INTO transactions (date, category, amount, description, expense) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![date, category, amount, description, expense],
        )?;

        Ok(json!("Transaction added successfully."))
    }
}

/// `execute_sql`: run one SQL statement and return all result rows. In
/// read-only mode anything that is not a SELECT-shaped statement is
/// rejected before execution.
pub struct ExecuteSqlTool {
    db_path: PathBuf,
    mode: AccessMode,
}

impl ExecuteSqlTool {
    pub fn new(db_path: PathBuf, mode: AccessMode) -> Self {
        Self { db_path, mode }
    }
}

impl Tool for ExecuteSqlTool {
    fn spec(&self) -> ToolSpec {
        let description = match self.mode {
            AccessMode::ReadOnly => {
                "Execute a read-only SQL query against the transactions database and return the rows"
            }
            AccessMode::ReadWrite => {
                "Execute a SQL query against the transactions database and return the rows"
            }
        };
        ToolSpec {
            name: "execute_sql",
            description,
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "SQL query"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    fn call(&self, args: &Value) -> Result<Value> {
        let sql = require_str(args, "query")?;
        let conn = get_connection(&self.db_path)?;
        let result = execute_sql(&conn, sql, self.mode)?;

        if !result.rows.is_empty() {
            println!("{}", render_rows(&result.columns, &result.rows));
        }

        Ok(Value::Array(
            result.rows.into_iter().map(Value::Array).collect(),
        ))
    }
}

/// `calculator`: four-operator arithmetic. Unknown operators and division
/// by zero surface as errors instead of sentinel values.
pub struct CalculatorTool;

impl Tool for CalculatorTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "calculator",
            description: "Calculate the result of a mathematical operation: +, -, *, /",
            parameters: json!({
                "type": "object",
                "properties": {
                    "a": { "type": "number" },
                    "b": { "type": "number" },
                    "operator": {
                        "type": "string",
                        "enum": ["+", "-", "*", "/"]
                    }
                },
                "required": ["a", "b", "operator"]
            }),
        }
    }

    fn call(&self, args: &Value) -> Result<Value> {
        let a = require_f64(args, "a")?;
        let b = require_f64(args, "b")?;
        let operator = require_str(args, "operator")?;

        let result = match operator {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" => {
                if b == 0.0 {
                    return Err(PennyError::DivisionByZero);
                }
                a / b
            }
            other => return Err(PennyError::InvalidOperator(other.to_string())),
        };

        Ok(json!(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use rusqlite::Connection;

    fn test_db() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let conn = get_connection(&path).unwrap();
        init_db(&conn).unwrap();
        (dir, path)
    }

    fn row_count(path: &PathBuf) -> i64 {
        let conn = Connection::open(path).unwrap();
        conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_store_data_appends_one_matching_row() {
        let (_dir, path) = test_db();
        let tool = StoreTransactionTool::new(path.clone());
        let result = tool
            .call(&json!({
                "expense": true,
                "date": "2025-06-10",
                "category": "Eating Out",
                "amount": 23.40,
                "description": "Lunch with friends"
            }))
            .unwrap();
        assert_eq!(result, json!("Transaction added successfully."));
        assert_eq!(row_count(&path), 1);

        let conn = Connection::open(&path).unwrap();
        let (id, date, category, amount, expense): (i64, String, String, f64, bool) = conn
            .query_row(
                "SELECT id, date, category, amount, expense FROM transactions",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
            )
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(date, "2025-06-10");
        assert_eq!(category, "Eating Out");
        assert_eq!(amount, 23.40);
        assert!(expense);
    }

    #[test]
    fn test_store_data_ids_increase() {
        let (_dir, path) = test_db();
        let tool = StoreTransactionTool::new(path.clone());
        for i in 1..=3 {
            tool.call(&json!({
                "expense": false,
                "date": "2025-01-01",
                "category": "Salary",
                "amount": 3000.0 + i as f64,
                "description": "Monthly salary"
            }))
            .unwrap();
        }
        let conn = Connection::open(&path).unwrap();
        let max_id: i64 = conn
            .query_row("SELECT max(id) FROM transactions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(max_id, 3);
    }

    #[test]
    fn test_store_data_rejects_missing_arguments() {
        let (_dir, path) = test_db();
        let tool = StoreTransactionTool::new(path.clone());
        let result = tool.call(&json!({ "expense": true }));
        assert!(matches!(result, Err(PennyError::ToolArgs(_))));
        assert_eq!(row_count(&path), 0);
    }

    #[test]
    fn test_execute_sql_tool_round_trip() {
        let (_dir, path) = test_db();
        let tool = ExecuteSqlTool::new(path.clone(), AccessMode::ReadWrite);
        tool.call(&json!({
            "query": "INSERT INTO transactions (date, category, amount, description, expense) \
                      VALUES ('2025-02-02', 'Sports', 60.0, 'gym', 1)"
        }))
        .unwrap();
        let rows = tool
            .call(&json!({ "query": "SELECT category, amount FROM transactions" }))
            .unwrap();
        assert_eq!(rows, json!([["Sports", 60.0]]));
    }

    #[test]
    fn test_execute_sql_tool_empty_select_is_empty_array() {
        let (_dir, path) = test_db();
        let tool = ExecuteSqlTool::new(path, AccessMode::ReadOnly);
        let rows = tool
            .call(&json!({ "query": "SELECT * FROM transactions" }))
            .unwrap();
        assert_eq!(rows, json!([]));
    }

    #[test]
    fn test_execute_sql_tool_read_only_rejects_delete() {
        let (_dir, path) = test_db();
        let tool = ExecuteSqlTool::new(path, AccessMode::ReadOnly);
        let result = tool.call(&json!({ "query": "DELETE FROM transactions" }));
        assert!(matches!(result, Err(PennyError::ReadOnly(_))));
    }

    #[test]
    fn test_calculator_four_operators() {
        let tool = CalculatorTool;
        let cases = [("+", 6.0), ("-", 2.0), ("*", 8.0), ("/", 2.0)];
        for (op, expected) in cases {
            let result = tool
                .call(&json!({ "a": 4.0, "b": 2.0, "operator": op }))
                .unwrap();
            assert_eq!(result, json!(expected), "operator {op}");
        }
    }

    #[test]
    fn test_calculator_invalid_operator_is_an_error() {
        let tool = CalculatorTool;
        let result = tool.call(&json!({ "a": 4.0, "b": 2.0, "operator": "%" }));
        assert!(matches!(result, Err(PennyError::InvalidOperator(_))));
    }

    #[test]
    fn test_calculator_division_by_zero_is_an_error() {
        let tool = CalculatorTool;
        let result = tool.call(&json!({ "a": 4.0, "b": 0.0, "operator": "/" }));
        assert!(matches!(result, Err(PennyError::DivisionByZero)));
    }

    #[test]
    fn test_registry_dispatch_and_unknown_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(CalculatorTool));
        let result = registry
            .call("calculator", &json!({ "a": 1.0, "b": 2.0, "operator": "+" }))
            .unwrap();
        assert_eq!(result, json!(3.0));
        assert!(matches!(
            registry.call("nope", &json!({})),
            Err(PennyError::UnknownTool(_))
        ));
    }

    #[test]
    fn test_store_data_schema_lists_categories() {
        let (_dir, path) = test_db();
        let tool = StoreTransactionTool::new(path);
        let spec = tool.spec();
        let categories = spec.parameters["properties"]["category"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(categories.len(), 12);
    }
}
