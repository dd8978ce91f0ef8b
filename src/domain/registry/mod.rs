//! Registry domain - catalog of named, versioned models

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::domain::model::{ModelName, ModelSummary, PredictiveModel};
use crate::domain::session::{Namespace, Session};
use crate::domain::DomainError;

/// Backend lookup of models scoped to a namespace
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Default version of the named model, if registered
    async fn get_model(
        &self,
        namespace: &Namespace,
        name: &ModelName,
    ) -> Result<Option<Arc<dyn PredictiveModel>>, DomainError>;

    /// All models registered in the namespace
    async fn list_models(&self, namespace: &Namespace) -> Result<Vec<ModelSummary>, DomainError>;
}

/// Registry client bound to a session and its active namespace
pub struct Registry {
    namespace: Namespace,
    backend: Arc<dyn ModelRegistry>,
}

impl Registry {
    /// Bind to the session's current namespace
    ///
    /// Fails if the session has no active database and schema.
    pub fn new(session: Arc<dyn Session>) -> Result<Self, DomainError> {
        let namespace = session.current_namespace()?.ok_or_else(|| {
            DomainError::session(format!(
                "Session {} has no active database and schema",
                session.id()
            ))
        })?;

        Ok(Self {
            namespace,
            backend: session.model_registry(),
        })
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Fetch a model by registered name
    pub async fn get_model(&self, name: &ModelName) -> Result<Arc<dyn PredictiveModel>, DomainError> {
        debug!(namespace = %self.namespace, model = %name, "Looking up model");

        self.backend
            .get_model(&self.namespace, name)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Model '{}' not found in {}",
                    name, self.namespace
                ))
            })
    }

    pub async fn list_models(&self) -> Result<Vec<ModelSummary>, DomainError> {
        self.backend.list_models(&self.namespace).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::mock::RecordingSession;
    use crate::domain::session::Identifier;

    fn namespace() -> Namespace {
        Namespace::new(
            Identifier::new("ml_database").unwrap(),
            Identifier::new("ml_schema").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_new_requires_namespace() {
        let session = Arc::new(RecordingSession::new(Arc::new(MockModelRegistry::new())));

        let result = Registry::new(session.clone());
        assert!(matches!(result, Err(DomainError::Session { .. })));

        session
            .use_database(&Identifier::new("ml_database").unwrap())
            .await
            .unwrap();
        assert!(Registry::new(session.clone()).is_err());

        session
            .use_schema(&Identifier::new("ml_schema").unwrap())
            .await
            .unwrap();
        let registry = Registry::new(session).unwrap();
        assert_eq!(registry.namespace(), &namespace());
    }

    #[tokio::test]
    async fn test_get_model_missing_is_not_found() {
        let mut backend = MockModelRegistry::new();
        backend
            .expect_get_model()
            .times(1)
            .returning(|_, _| Ok(None));

        let session = Arc::new(RecordingSession::new(Arc::new(backend)));
        session
            .use_database(&Identifier::new("ml_database").unwrap())
            .await
            .unwrap();
        session
            .use_schema(&Identifier::new("ml_schema").unwrap())
            .await
            .unwrap();

        let registry = Registry::new(session).unwrap();
        let err = registry
            .get_model(&ModelName::new("CATEGORY_1_MODEL").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("ML_DATABASE.ML_SCHEMA"));
    }

    #[tokio::test]
    async fn test_list_models_uses_bound_namespace() {
        let mut backend = MockModelRegistry::new();
        backend
            .expect_list_models()
            .withf(|ns| ns == &namespace())
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let session = Arc::new(RecordingSession::new(Arc::new(backend)));
        session
            .use_database(&Identifier::new("ml_database").unwrap())
            .await
            .unwrap();
        session
            .use_schema(&Identifier::new("ml_schema").unwrap())
            .await
            .unwrap();

        let registry = Registry::new(session).unwrap();
        assert!(registry.list_models().await.unwrap().is_empty());
    }
}
