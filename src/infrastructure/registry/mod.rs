//! Registry infrastructure

mod catalog_registry;

pub use catalog_registry::CatalogModelRegistry;
