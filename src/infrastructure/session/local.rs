//! Local sessions over an in-memory catalog

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use super::catalog::Catalog;
use crate::domain::registry::ModelRegistry;
use crate::domain::relation::Relation;
use crate::domain::session::{Identifier, Namespace, Session, SessionProvider};
use crate::domain::DomainError;
use crate::infrastructure::registry::CatalogModelRegistry;

#[derive(Debug, Default)]
struct ActiveNamespace {
    database: Option<Identifier>,
    schema: Option<Identifier>,
}

/// Session bound to a shared catalog with its own namespace state
pub struct LocalSession {
    id: String,
    catalog: Arc<Catalog>,
    registry: Arc<CatalogModelRegistry>,
    active: RwLock<ActiveNamespace>,
}

impl LocalSession {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let registry = Arc::new(CatalogModelRegistry::new(Arc::clone(&catalog)));

        Self {
            id: Uuid::new_v4().to_string(),
            catalog,
            registry,
            active: RwLock::new(ActiveNamespace::default()),
        }
    }

    fn poisoned() -> DomainError {
        DomainError::internal("Session state lock poisoned")
    }
}

#[async_trait]
impl Session for LocalSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn use_database(&self, database: &Identifier) -> Result<(), DomainError> {
        if !self.catalog.has_database(database) {
            return Err(DomainError::not_found(format!(
                "Database '{}' does not exist",
                database
            )));
        }

        let mut active = self.active.write().map_err(|_| Self::poisoned())?;
        active.database = Some(database.clone());
        active.schema = None;

        debug!(session = %self.id, database = %database, "Using database");
        Ok(())
    }

    async fn use_schema(&self, schema: &Identifier) -> Result<(), DomainError> {
        let mut active = self.active.write().map_err(|_| Self::poisoned())?;

        let database = active.database.clone().ok_or_else(|| {
            DomainError::session(format!(
                "Cannot use schema '{}': no active database",
                schema
            ))
        })?;

        if !self.catalog.has_schema(&database, schema) {
            return Err(DomainError::not_found(format!(
                "Schema '{}.{}' does not exist",
                database, schema
            )));
        }

        active.schema = Some(schema.clone());

        debug!(session = %self.id, schema = %schema, "Using schema");
        Ok(())
    }

    fn current_namespace(&self) -> Result<Option<Namespace>, DomainError> {
        let active = self.active.read().map_err(|_| Self::poisoned())?;

        Ok(match (&active.database, &active.schema) {
            (Some(database), Some(schema)) => {
                Some(Namespace::new(database.clone(), schema.clone()))
            }
            _ => None,
        })
    }

    async fn table(&self, name: &Identifier) -> Result<Relation, DomainError> {
        let namespace = self.current_namespace()?.ok_or_else(|| {
            DomainError::session(format!(
                "Cannot read table '{}': no active database and schema",
                name
            ))
        })?;

        let table = self.catalog.table(&namespace, name).ok_or_else(|| {
            DomainError::not_found(format!("Table '{}.{}' does not exist", namespace, name))
        })?;

        Ok(Relation::new(format!("{}.{}", namespace, name), table))
    }

    fn model_registry(&self) -> Arc<dyn ModelRegistry> {
        self.registry.clone()
    }
}

/// Hands out a fresh [`LocalSession`] per request
pub struct LocalSessionProvider {
    catalog: Arc<Catalog>,
    enabled: bool,
}

impl LocalSessionProvider {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            enabled: true,
        }
    }

    /// Provider whose host has no active session
    pub fn disabled() -> Self {
        Self {
            catalog: Arc::new(Catalog::new()),
            enabled: false,
        }
    }
}

#[async_trait]
impl SessionProvider for LocalSessionProvider {
    async fn active_session(&self) -> Result<Arc<dyn Session>, DomainError> {
        if !self.enabled {
            return Err(DomainError::session("No active session"));
        }

        let session = LocalSession::new(Arc::clone(&self.catalog));
        info!(session = %session.id, "Session acquired");

        Ok(Arc::new(session))
    }
}
