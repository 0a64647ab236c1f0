//! Structural validation of schema documents
//!
//! Checks run in a fixed order and every failure is collected, so callers get
//! the full list of problems in one pass:
//!
//! 1. the schema has a name
//! 2. the schema has at least one table
//! 3. every table has a name and fields, with no repeated table or field names
//! 4. every relation points at existing source and target tables

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::core::schema::Schema;

/// Outcome of [`validate_schema`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.valid = false;
    }

    /// Convert to Result, carrying every message on failure
    pub fn into_result(self) -> Result<()> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::InvalidSchema(self.errors))
        }
    }
}

/// Validates a schema for referential integrity.
///
/// Never fails; problems are reported through [`ValidationResult::errors`].
pub fn validate_schema(schema: &Schema) -> ValidationResult {
    let mut result = ValidationResult::new();

    if schema.metadata.name.is_empty() {
        result.add_error("schema has no name");
    }

    if schema.tables.is_empty() {
        result.add_error("schema has no tables");
    }

    let mut seen_tables = HashSet::new();
    for (index, table) in schema.tables.iter().enumerate() {
        let position = index + 1;

        if table.name.is_empty() {
            result.add_error(format!("table #{} has no name", position));
        } else if !seen_tables.insert(table.name.as_str()) {
            result.add_error(format!("duplicate table name '{}'", table.name));
        }

        if table.fields.is_empty() {
            let table_ref = if table.name.is_empty() {
                position.to_string()
            } else {
                table.name.clone()
            };
            result.add_error(format!("table {} has no fields", table_ref));
        }

        for field in table.fields.duplicate_names() {
            result.add_error(format!(
                "table '{}' has duplicate field '{}'",
                table.name, field
            ));
        }
    }

    let table_names: HashSet<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    for (index, relation) in schema.relations.iter().enumerate() {
        let position = index + 1;

        if !table_names.contains(relation.source.as_str()) {
            result.add_error(format!(
                "relation #{}: source table '{}' does not exist",
                position, relation.source
            ));
        }

        if !table_names.contains(relation.target.as_str()) {
            result.add_error(format!(
                "relation #{}: target table '{}' does not exist",
                position, relation.target
            ));
        }
    }

    if !result.valid {
        tracing::debug!(
            "Schema '{}' failed validation with {} error(s)",
            schema.metadata.name,
            result.errors.len()
        );
    }

    result
}
