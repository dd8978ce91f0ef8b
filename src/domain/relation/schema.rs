//! Column layout of a relation

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Ordered column names; lookups ignore case
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    pub fn new<I, S>(columns: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Self::default();

        for column in columns {
            schema.push(column)?;
        }

        Ok(schema)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Position of `name`, or a `MissingColumn` error
    pub fn require(&self, name: &str) -> Result<usize, DomainError> {
        self.index_of(name)
            .ok_or_else(|| DomainError::missing_column(name, &self.columns))
    }

    /// Append a column; names must be non-empty and unique
    pub fn push(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("Column name cannot be empty"));
        }

        if self.contains(&name) {
            return Err(DomainError::validation(format!(
                "Duplicate column '{}'",
                name
            )));
        }

        self.columns.push(name);
        Ok(())
    }
}
