//! Session infrastructure - local catalog-backed sessions

mod catalog;
mod local;

pub use catalog::{
    Catalog, DatabaseDefinition, ModelDefinition, ModelKind, ModelVersionDefinition,
    SchemaDefinition, TableDefinition, WorkspaceFile,
};
pub use local::{LocalSession, LocalSessionProvider};
