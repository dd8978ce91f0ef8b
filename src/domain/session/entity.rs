//! Identifiers and namespaces

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::{validate_identifier, IdentifierError};

/// Unquoted catalog identifier, normalized to upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Create a new Identifier after validation
    pub fn new(identifier: impl Into<String>) -> Result<Self, IdentifierError> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;
        Ok(Self(identifier.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database + schema pair scoping tables and registered models
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    pub database: Identifier,
    pub schema: Identifier,
}

impl Namespace {
    pub fn new(database: Identifier, schema: Identifier) -> Self {
        Self { database, schema }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_normalized() {
        let id = Identifier::new("ml_database").unwrap();
        assert_eq!(id.as_str(), "ML_DATABASE");
        assert_eq!(id, Identifier::new("ML_Database").unwrap());
    }

    #[test]
    fn test_identifier_deserialization_validates() {
        let ok: Result<Identifier, _> = serde_json::from_str("\"raw_data\"");
        assert_eq!(ok.unwrap().as_str(), "RAW_DATA");

        let bad: Result<Identifier, _> = serde_json::from_str("\"raw-data\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_namespace_display() {
        let ns = Namespace::new(
            Identifier::new("ml_database").unwrap(),
            Identifier::new("ml_schema").unwrap(),
        );
        assert_eq!(ns.to_string(), "ML_DATABASE.ML_SCHEMA");
    }
}
