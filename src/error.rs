//! Error types for the quilldb engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table already exists: {0}")]
    DuplicateTable(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid primary key column: {0}")]
    InvalidPrimaryKey(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Primary key violation: {0}")]
    ConstraintViolation(String),

    #[error("Parameter binding error: {0}")]
    Binding(String),
}
