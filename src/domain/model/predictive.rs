//! Predictive model trait

use std::fmt;

use async_trait::async_trait;

use super::{ModelName, ModelVersion};
use crate::domain::relation::Relation;
use crate::domain::DomainError;

/// Loaded, immutable model that can score relations
#[async_trait]
pub trait PredictiveModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &ModelName;

    fn version(&self) -> &ModelVersion;

    /// Names of the callable inference functions (e.g. `predict`)
    fn functions(&self) -> Vec<String>;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Apply `function_name` to `input`, returning a relation with the
    /// prediction columns appended
    async fn run(&self, input: &Relation, function_name: &str) -> Result<Relation, DomainError>;
}

/// Fail unless `model` exposes `function_name`
pub fn ensure_function(
    model: &dyn PredictiveModel,
    function_name: &str,
) -> Result<(), DomainError> {
    let functions = model.functions();

    if functions.iter().any(|f| f == function_name) {
        return Ok(());
    }

    Err(DomainError::inference(format!(
        "Function '{}' not found on model {} version {} (available: {})",
        function_name,
        model.name(),
        model.version(),
        functions.join(", ")
    )))
}
