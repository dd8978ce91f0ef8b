use serde::Deserialize;

use crate::domain::dashboard::{validate_function_name, PageText};
use crate::domain::{
    DashboardSettings, DomainError, FilterMode, Identifier, ModelName, Namespace, TargetMonth,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub session: SessionConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Local session host
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// When false no session is active and every pipeline run fails
    pub enabled: bool,
    /// JSON workspace with databases, tables and registered models
    pub workspace_path: String,
}

/// Names and page text used by the prediction pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub database: String,
    pub schema: String,
    pub model_name: String,
    pub inference_function: String,
    pub source_table: String,
    pub target_month: u32,
    pub filter_mode: FilterMode,
    pub title: String,
    pub description: String,
    pub heading: String,
    pub subheading: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            workspace_path: "data/workspace.json".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database: "ml_database".to_string(),
            schema: "ml_schema".to_string(),
            model_name: "CATEGORY_1_MODEL".to_string(),
            inference_function: "predict".to_string(),
            source_table: "raw_data".to_string(),
            target_month: 1,
            filter_mode: FilterMode::default(),
            title: "Predictions".to_string(),
            description: "Proof of concept Machine Learning app to predict categories."
                .to_string(),
            heading: "January 2024".to_string(),
            subheading: "Category 1 Predictions".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Validate names and build the pipeline settings
    pub fn to_settings(&self) -> Result<DashboardSettings, DomainError> {
        let identifier = |field: &str, value: &str| {
            Identifier::new(value).map_err(|e| {
                DomainError::configuration(format!("Invalid dashboard.{}: {}", field, e))
            })
        };

        let namespace = Namespace::new(
            identifier("database", &self.database)?,
            identifier("schema", &self.schema)?,
        );
        let source_table = identifier("source_table", &self.source_table)?;

        let model_name = ModelName::new(&self.model_name).map_err(|e| {
            DomainError::configuration(format!("Invalid dashboard.model_name: {}", e))
        })?;

        validate_function_name(&self.inference_function)
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        let target_month = TargetMonth::new(self.target_month)
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        Ok(DashboardSettings {
            namespace,
            model_name,
            inference_function: self.inference_function.clone(),
            source_table,
            target_month,
            filter_mode: self.filter_mode,
            text: PageText {
                title: self.title.clone(),
                description: self.description.clone(),
                heading: self.heading.clone(),
                subheading: self.subheading.clone(),
            },
        })
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.to_settings().map(|_| ())
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(Self::environment())
    }

    /// `APP__SECTION__KEY` overrides
    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment)
            .build()?;

        config.try_deserialize()
    }
}
