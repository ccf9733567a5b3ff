use thiserror::Error;

#[derive(Error, Debug)]
pub enum PennyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Assistant error: {0}")]
    Llm(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool arguments: {0}")]
    ToolArgs(String),

    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Statement rejected in read-only mode: {0}")]
    ReadOnly(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PennyError>;
