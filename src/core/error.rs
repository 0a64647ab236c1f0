//! Error types shared across the schema core

/// Errors raised by the strict constructors, the diagram pipeline and I/O helpers.
///
/// Structural problems found by [`validate_schema`](crate::core::validate_schema)
/// are reported as plain messages and only become an [`Error`] through
/// [`ValidationResult::into_result`](crate::core::ValidationResult::into_result).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Table '{0}' already exists")]
    DuplicateTable(String),

    #[error("{}", duplicate_field_message(.table.as_deref(), .field))]
    DuplicateField {
        table: Option<String>,
        field: String,
    },

    #[error("Invalid schema: {}", .0.join("; "))]
    InvalidSchema(Vec<String>),

    #[error("Unknown layout direction '{0}' (expected LR or TB)")]
    InvalidDirection(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn duplicate_field_message(table: Option<&str>, field: &str) -> String {
    match table {
        Some(table) => format!("Column '{}' already exists in table '{}'", field, table),
        None => format!("Column '{}' already exists", field),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
