//! Model registry over the local catalog

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::model::{ModelName, ModelSummary, PredictiveModel};
use crate::domain::registry::ModelRegistry;
use crate::domain::session::Namespace;
use crate::domain::DomainError;
use crate::infrastructure::session::Catalog;

/// Read-only registry view of a [`Catalog`]
#[derive(Debug)]
pub struct CatalogModelRegistry {
    catalog: Arc<Catalog>,
}

impl CatalogModelRegistry {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ModelRegistry for CatalogModelRegistry {
    async fn get_model(
        &self,
        namespace: &Namespace,
        name: &ModelName,
    ) -> Result<Option<Arc<dyn PredictiveModel>>, DomainError> {
        Ok(self.catalog.model(namespace, name))
    }

    async fn list_models(&self, namespace: &Namespace) -> Result<Vec<ModelSummary>, DomainError> {
        if !self
            .catalog
            .has_schema(&namespace.database, &namespace.schema)
        {
            return Err(DomainError::not_found(format!(
                "Namespace {} does not exist",
                namespace
            )));
        }

        Ok(self.catalog.models(namespace))
    }
}
