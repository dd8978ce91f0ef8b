//! Linear regression model

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::model::{ensure_function, ModelName, ModelVersion, PredictiveModel};
use crate::domain::relation::{col, Expr, Relation, ScalarFunction, Value};
use crate::domain::DomainError;

/// Name of the single inference function a linear model exposes
pub const PREDICT_FUNCTION: &str = "predict";

/// Default column the prediction is written to
pub const DEFAULT_OUTPUT_COLUMN: &str = "VALUE";

/// Stored definition of a linear model
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LinearModelSpec {
    /// Input columns, in weight order
    pub features: Vec<String>,
    pub weights: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default = "default_output_column")]
    pub output_column: String,
}

fn default_output_column() -> String {
    DEFAULT_OUTPUT_COLUMN.to_string()
}

impl LinearModelSpec {
    pub fn new(features: Vec<String>, weights: Vec<f64>, intercept: f64) -> Self {
        Self {
            features,
            weights,
            intercept,
            output_column: default_output_column(),
        }
    }

    pub fn with_output_column(mut self, column: impl Into<String>) -> Self {
        self.output_column = column.into();
        self
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.features.is_empty() {
            return Err(DomainError::validation(
                "Linear model needs at least one feature",
            ));
        }

        if self.features.len() != self.weights.len() {
            return Err(DomainError::validation(format!(
                "Linear model has {} features but {} weights",
                self.features.len(),
                self.weights.len()
            )));
        }

        if self.output_column.trim().is_empty() {
            return Err(DomainError::validation(
                "Linear model output column cannot be empty",
            ));
        }

        if !self.intercept.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(DomainError::validation(
                "Linear model coefficients must be finite",
            ));
        }

        Ok(())
    }
}

/// `intercept + Σ weight·feature` over one row
#[derive(Debug)]
struct LinearScorer {
    model: String,
    weights: Vec<f64>,
    intercept: f64,
}

impl ScalarFunction for LinearScorer {
    fn name(&self) -> &str {
        PREDICT_FUNCTION
    }

    fn invoke(&self, args: &[Value]) -> Result<Value, DomainError> {
        let mut score = self.intercept;

        for (value, weight) in args.iter().zip(&self.weights) {
            if value.is_null() {
                return Ok(Value::Null);
            }

            let x = value.as_f64().ok_or_else(|| {
                DomainError::inference(format!(
                    "Model {} expects numeric features, got {} '{}'",
                    self.model,
                    value.type_name(),
                    value
                ))
            })?;
            score += weight * x;
        }

        Ok(Value::Float(score))
    }
}

/// Registered linear regression model
#[derive(Debug)]
pub struct LinearModel {
    name: ModelName,
    version: ModelVersion,
    description: Option<String>,
    spec: LinearModelSpec,
    scorer: Arc<LinearScorer>,
}

impl LinearModel {
    pub fn new(
        name: ModelName,
        version: ModelVersion,
        spec: LinearModelSpec,
    ) -> Result<Self, DomainError> {
        spec.validate()?;

        let scorer = Arc::new(LinearScorer {
            model: name.to_string(),
            weights: spec.weights.clone(),
            intercept: spec.intercept,
        });

        Ok(Self {
            name,
            version,
            description: None,
            spec,
            scorer,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[async_trait]
impl PredictiveModel for LinearModel {
    fn name(&self) -> &ModelName {
        &self.name
    }

    fn version(&self) -> &ModelVersion {
        &self.version
    }

    fn functions(&self) -> Vec<String> {
        vec![PREDICT_FUNCTION.to_string()]
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    async fn run(&self, input: &Relation, function_name: &str) -> Result<Relation, DomainError> {
        ensure_function(self, function_name)?;

        debug!(
            model = %self.name,
            version = %self.version,
            relation = input.name(),
            output = %self.spec.output_column,
            "Scoring relation"
        );

        let args = self.spec.features.iter().map(col).collect();
        let scorer: Arc<dyn ScalarFunction> = self.scorer.clone();

        input.with_column(&self.spec.output_column, Expr::call(scorer, args))
    }
}
