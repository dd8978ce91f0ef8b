//! Identifier validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for unquoted identifiers
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Unquoted identifiers: letter or underscore first, then letters, digits, `_` or `$`
static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").unwrap());

/// Identifier validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierError {
    /// Identifier is empty
    Empty,
    /// Identifier exceeds maximum length
    TooLong { length: usize, max: usize },
    /// Identifier contains invalid characters
    InvalidFormat { identifier: String },
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Identifier cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "Identifier too long: {} characters (max {})", length, max)
            }
            Self::InvalidFormat { identifier } => write!(
                f,
                "Invalid identifier '{}': must start with a letter or underscore and contain only letters, digits, '_' or '$'",
                identifier
            ),
        }
    }
}

impl std::error::Error for IdentifierError {}

/// Validate an unquoted identifier
pub fn validate_identifier(identifier: &str) -> Result<(), IdentifierError> {
    if identifier.is_empty() {
        return Err(IdentifierError::Empty);
    }

    if identifier.len() > MAX_IDENTIFIER_LENGTH {
        return Err(IdentifierError::TooLong {
            length: identifier.len(),
            max: MAX_IDENTIFIER_LENGTH,
        });
    }

    if !IDENTIFIER_PATTERN.is_match(identifier) {
        return Err(IdentifierError::InvalidFormat {
            identifier: identifier.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("ml_database").is_ok());
        assert!(validate_identifier("ML_SCHEMA").is_ok());
        assert!(validate_identifier("CATEGORY_1_MODEL").is_ok());
        assert!(validate_identifier("_staging").is_ok());
        assert!(validate_identifier("raw$data").is_ok());
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(matches!(
            validate_identifier(""),
            Err(IdentifierError::Empty)
        ));

        let long = "a".repeat(256);
        assert!(matches!(
            validate_identifier(&long),
            Err(IdentifierError::TooLong { .. })
        ));

        assert!(matches!(
            validate_identifier("1model"),
            Err(IdentifierError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_identifier("ml-database"),
            Err(IdentifierError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_identifier("ml schema"),
            Err(IdentifierError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_max_length_identifier() {
        let max = "a".repeat(255);
        assert!(validate_identifier(&max).is_ok());
    }
}
