//! Session and session provider traits

use std::sync::Arc;

use async_trait::async_trait;

use super::{Identifier, Namespace};
use crate::domain::registry::ModelRegistry;
use crate::domain::relation::Relation;
use crate::domain::DomainError;

/// Handle to an authenticated compute/data context
///
/// A session carries the active namespace; tables and models are resolved
/// relative to it.
#[async_trait]
pub trait Session: Send + Sync {
    /// Identifier of this session, for logs
    fn id(&self) -> &str;

    /// Make `database` the active database, clearing the active schema
    async fn use_database(&self, database: &Identifier) -> Result<(), DomainError>;

    /// Make `schema` (inside the active database) the active schema
    async fn use_schema(&self, schema: &Identifier) -> Result<(), DomainError>;

    /// Active namespace, if both database and schema are set
    fn current_namespace(&self) -> Result<Option<Namespace>, DomainError>;

    /// Relation over a table in the active namespace
    async fn table(&self, name: &Identifier) -> Result<Relation, DomainError>;

    /// Model registry backing this session
    fn model_registry(&self) -> Arc<dyn ModelRegistry>;
}

/// Source of the currently active session
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Return the active session, or fail if the host has none
    async fn active_session(&self) -> Result<Arc<dyn Session>, DomainError>;
}
