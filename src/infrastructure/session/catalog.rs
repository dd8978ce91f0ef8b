//! In-memory catalog of databases, schemas, tables and models

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::model::{ModelName, ModelSummary, ModelVersion, PredictiveModel};
use crate::domain::relation::{LocalTable, TableData};
use crate::domain::session::{Identifier, Namespace};
use crate::domain::DomainError;
use crate::infrastructure::model::{LinearModel, LinearModelSpec};

/// Catalog backing local sessions; read-only once built
#[derive(Debug, Default)]
pub struct Catalog {
    databases: HashMap<Identifier, DatabaseEntry>,
}

#[derive(Debug, Default)]
struct DatabaseEntry {
    schemas: HashMap<Identifier, SchemaEntry>,
}

#[derive(Debug, Default)]
struct SchemaEntry {
    tables: HashMap<Identifier, Arc<LocalTable>>,
    models: BTreeMap<ModelName, RegisteredModel>,
}

#[derive(Debug, Default)]
struct RegisteredModel {
    versions: Vec<Arc<dyn PredictiveModel>>,
    default_version: Option<ModelVersion>,
    description: Option<String>,
}

impl RegisteredModel {
    /// Flagged default version, else the most recently registered one
    fn default_model(&self) -> Option<&Arc<dyn PredictiveModel>> {
        self.default_version
            .as_ref()
            .and_then(|default| self.versions.iter().find(|m| m.version() == default))
            .or_else(|| self.versions.last())
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn schema_entry(&mut self, namespace: &Namespace) -> &mut SchemaEntry {
        self.databases
            .entry(namespace.database.clone())
            .or_default()
            .schemas
            .entry(namespace.schema.clone())
            .or_default()
    }

    /// Register an (empty) namespace
    pub fn with_namespace(mut self, namespace: &Namespace) -> Self {
        self.schema_entry(namespace);
        self
    }

    pub fn with_table(mut self, namespace: &Namespace, name: Identifier, table: LocalTable) -> Self {
        self.schema_entry(namespace)
            .tables
            .insert(name, Arc::new(table));
        self
    }

    /// Register a model version; `is_default` marks it as the version `model()` returns
    pub fn with_model(
        mut self,
        namespace: &Namespace,
        model: Arc<dyn PredictiveModel>,
        is_default: bool,
    ) -> Self {
        let entry = self
            .schema_entry(namespace)
            .models
            .entry(model.name().clone())
            .or_default();

        if is_default {
            entry.default_version = Some(model.version().clone());
        }

        if entry.description.is_none() {
            entry.description = model.description().map(str::to_string);
        }

        entry.versions.push(model);
        self
    }

    pub fn has_database(&self, database: &Identifier) -> bool {
        self.databases.contains_key(database)
    }

    pub fn has_schema(&self, database: &Identifier, schema: &Identifier) -> bool {
        self.databases
            .get(database)
            .is_some_and(|db| db.schemas.contains_key(schema))
    }

    fn schema(&self, namespace: &Namespace) -> Option<&SchemaEntry> {
        self.databases
            .get(&namespace.database)?
            .schemas
            .get(&namespace.schema)
    }

    pub fn table(&self, namespace: &Namespace, name: &Identifier) -> Option<Arc<LocalTable>> {
        self.schema(namespace)?.tables.get(name).cloned()
    }

    /// Default version of a registered model
    pub fn model(&self, namespace: &Namespace, name: &ModelName) -> Option<Arc<dyn PredictiveModel>> {
        self.schema(namespace)?
            .models
            .get(name)?
            .default_model()
            .cloned()
    }

    pub fn models(&self, namespace: &Namespace) -> Vec<ModelSummary> {
        let Some(schema) = self.schema(namespace) else {
            return Vec::new();
        };

        schema
            .models
            .iter()
            .filter_map(|(name, registered)| {
                let default = registered.default_model()?;

                Some(ModelSummary {
                    name: name.clone(),
                    versions: registered
                        .versions
                        .iter()
                        .map(|m| m.version().clone())
                        .collect(),
                    default_version: default.version().clone(),
                    functions: default.functions(),
                    description: registered.description.clone(),
                })
            })
            .collect()
    }

    /// Build a catalog from a parsed workspace file
    pub fn from_workspace(workspace: WorkspaceFile) -> Result<Self, DomainError> {
        let mut catalog = Self::new();

        for database in workspace.databases {
            for schema in database.schemas {
                let namespace = Namespace::new(database.name.clone(), schema.name);
                catalog = catalog.with_namespace(&namespace);

                for table in schema.tables {
                    let data = LocalTable::try_from(table.data).map_err(|e| {
                        DomainError::configuration(format!(
                            "Table {}.{}: {}",
                            namespace, table.name, e
                        ))
                    })?;
                    catalog = catalog.with_table(&namespace, table.name, data);
                }

                for model in schema.models {
                    catalog = catalog.register_definition(&namespace, model)?;
                }
            }
        }

        Ok(catalog)
    }

    fn register_definition(
        mut self,
        namespace: &Namespace,
        definition: ModelDefinition,
    ) -> Result<Self, DomainError> {
        if let Some(default) = &definition.default_version {
            if !definition.versions.iter().any(|v| &v.version == default) {
                return Err(DomainError::configuration(format!(
                    "Model {}.{} declares default version {} which is not defined",
                    namespace, definition.name, default
                )));
            }
        }

        for version in definition.versions {
            let is_default = definition.default_version.as_ref() == Some(&version.version);

            let model: Arc<dyn PredictiveModel> = match version.kind {
                ModelKind::Linear(spec) => {
                    let mut model =
                        LinearModel::new(definition.name.clone(), version.version, spec)
                            .map_err(|e| {
                                DomainError::configuration(format!(
                                    "Model {}.{}: {}",
                                    namespace, definition.name, e
                                ))
                            })?;

                    if let Some(description) = &definition.description {
                        model = model.with_description(description.clone());
                    }
                    Arc::new(model)
                }
            };

            self = self.with_model(namespace, model, is_default);
        }

        Ok(self)
    }

    /// Read a JSON workspace file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DomainError::configuration(format!(
                "Cannot read workspace file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let workspace: WorkspaceFile = serde_json::from_str(&contents).map_err(|e| {
            DomainError::configuration(format!(
                "Invalid workspace file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let catalog = Self::from_workspace(workspace)?;
        info!(
            path = %path.display(),
            databases = catalog.databases.len(),
            "Workspace catalog loaded"
        );

        Ok(catalog)
    }
}

/// On-disk workspace layout
#[derive(Debug, Deserialize)]
pub struct WorkspaceFile {
    #[serde(default)]
    pub databases: Vec<DatabaseDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseDefinition {
    pub name: Identifier,
    #[serde(default)]
    pub schemas: Vec<SchemaDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct SchemaDefinition {
    pub name: Identifier,
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
    #[serde(default)]
    pub models: Vec<ModelDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct TableDefinition {
    pub name: Identifier,
    #[serde(flatten)]
    pub data: TableData,
}

#[derive(Debug, Deserialize)]
pub struct ModelDefinition {
    pub name: ModelName,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_version: Option<ModelVersion>,
    pub versions: Vec<ModelVersionDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct ModelVersionDefinition {
    pub version: ModelVersion,
    #[serde(flatten)]
    pub kind: ModelKind,
}

/// Supported model implementations
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelKind {
    Linear(LinearModelSpec),
}
