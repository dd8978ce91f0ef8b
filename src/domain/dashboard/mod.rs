//! Dashboard domain - validated pipeline settings

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::model::ModelName;
use crate::domain::session::{validate_identifier, Identifier, Namespace};
use crate::domain::DomainError;

/// What happens to the month filter before materialization
///
/// `Applied` materializes the filtered predictions. `Discarded` still builds
/// (and therefore validates) the filter but materializes the unfiltered
/// predictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Applied,
    Discarded,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied => write!(f, "applied"),
            Self::Discarded => write!(f, "discarded"),
        }
    }
}

/// Calendar month, 1-12
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u32")]
pub struct TargetMonth(u32);

impl TargetMonth {
    pub fn new(month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "Invalid target month {}: must be between 1 and 12",
                month
            )));
        }
        Ok(Self(month))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<TargetMonth> for u32 {
    fn from(month: TargetMonth) -> Self {
        month.0
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text shown around the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageText {
    pub title: String,
    pub description: String,
    pub heading: String,
    pub subheading: String,
}

impl PageText {
    /// Markdown block with the heading and subheading
    pub fn markdown(&self) -> String {
        format!("# {}\n## {}\n", self.heading, self.subheading)
    }
}

/// Everything one pipeline run needs, validated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSettings {
    pub namespace: Namespace,
    pub model_name: ModelName,
    pub inference_function: String,
    pub source_table: Identifier,
    pub target_month: TargetMonth,
    pub filter_mode: FilterMode,
    pub text: PageText,
}

/// Validate an inference function name; unlike identifiers, case is kept
pub fn validate_function_name(name: &str) -> Result<(), DomainError> {
    validate_identifier(name).map_err(|e| {
        DomainError::validation(format!("Invalid inference function name: {}", e))
    })
}
