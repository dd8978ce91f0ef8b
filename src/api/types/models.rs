//! Model listing types

use serde::Serialize;

use crate::domain::{ModelSummary, Namespace};

/// List models response
#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub object: String,
    pub namespace: Namespace,
    pub data: Vec<ModelSummary>,
}

impl ModelsResponse {
    pub fn new(namespace: Namespace, models: Vec<ModelSummary>) -> Self {
        Self {
            object: "list".to_string(),
            namespace,
            data: models,
        }
    }
}
