//! Model domain - registered predictive models

mod entity;
mod predictive;

pub use entity::{ModelName, ModelSummary, ModelVersion};
pub use predictive::{ensure_function, PredictiveModel};
