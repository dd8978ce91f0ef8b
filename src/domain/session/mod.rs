//! Session domain - handles to the hosting compute/data context

mod entity;
#[cfg(test)]
pub mod mock;
mod provider;
mod validation;

pub use entity::{Identifier, Namespace};
pub use provider::{Session, SessionProvider};
pub use validation::{validate_identifier, IdentifierError, MAX_IDENTIFIER_LENGTH};

use crate::domain::DomainError;

impl From<IdentifierError> for DomainError {
    fn from(err: IdentifierError) -> Self {
        DomainError::validation(err.to_string())
    }
}
