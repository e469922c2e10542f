use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadError {
    /// A single statement failed or the connection is unusable.
    Execution(String),
    /// One parameter set of a batch failed; nothing from the batch was committed.
    BatchExecution {
        row: Option<usize>,
        message: String,
    },
    /// Creating a table failed.
    Schema { table: String, message: String },
    /// A mapped row does not fit the table's insert shape.
    ColumnMismatch {
        table: String,
        row: usize,
        column: String,
        message: String,
    },
    /// A mapping source key is absent from a CSV row.
    MissingField { source_key: String, row: usize },
    Config(String),
    ParseError(String),
    IoError(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Execution(msg) => write!(f, "Execution error: {}", msg),
            LoadError::BatchExecution {
                row: Some(row),
                message,
            } => write!(f, "Batch execution error at row {}: {}", row, message),
            LoadError::BatchExecution { row: None, message } => {
                write!(f, "Batch execution error: {}", message)
            }
            LoadError::Schema { table, message } => {
                write!(f, "Schema error on table '{}': {}", table, message)
            }
            LoadError::ColumnMismatch {
                table,
                row,
                column,
                message,
            } => write!(
                f,
                "Column mismatch on table '{}', row {}, column '{}': {}",
                table, row, column, message
            ),
            LoadError::MissingField { source_key, row } => {
                write!(f, "Missing field '{}' in CSV row {}", source_key, row)
            }
            LoadError::Config(msg) => write!(f, "Config error: {}", msg),
            LoadError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            LoadError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
