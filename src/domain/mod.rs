//! Domain layer - Core types and the seams of the prediction pipeline

pub mod chart;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod presentation;
pub mod registry;
pub mod relation;
pub mod session;

pub use chart::{ChartOptions, ChartSpec, FieldDef, FieldType, LegendOrient};
pub use dashboard::{DashboardSettings, FilterMode, PageText, TargetMonth};
pub use error::DomainError;
pub use model::{ModelName, ModelSummary, ModelVersion, PredictiveModel};
pub use presentation::{Page, PageElement, Presenter};
pub use registry::{ModelRegistry, Registry};
pub use relation::{col, lit, month, LocalTable, Predicate, Relation, Schema, Value};
pub use session::{Identifier, Namespace, Session, SessionProvider};
