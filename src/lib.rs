//! Prediction Dashboard
//!
//! Loads a registered model through a session, scores the raw records,
//! filters the predictions to a target month and presents them as a
//! grouped bar chart:
//! - Catalog-backed local sessions and model registry
//! - Lazy relations with month filtering
//! - Vega-Lite chart output, served over HTTP or rendered to a file

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use domain::SessionProvider;
use infrastructure::services::DashboardService;
use infrastructure::session::{Catalog, LocalSessionProvider};

/// Create the dashboard service described by `config`
///
/// Fails on invalid dashboard names or an unreadable workspace file.
pub fn create_dashboard_service(config: &AppConfig) -> anyhow::Result<DashboardService> {
    let settings = config.dashboard.to_settings()?;

    let provider: Arc<dyn SessionProvider> = if config.session.enabled {
        let catalog = Catalog::load(&config.session.workspace_path)?;
        Arc::new(LocalSessionProvider::new(Arc::new(catalog)))
    } else {
        warn!("Session host disabled; every dashboard run will fail");
        Arc::new(LocalSessionProvider::disabled())
    };

    info!(
        namespace = %settings.namespace,
        model = %settings.model_name,
        target_month = %settings.target_month,
        filter_mode = %settings.filter_mode,
        "Dashboard configured"
    );

    Ok(DashboardService::new(provider, settings))
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let service = create_dashboard_service(config)?;
    Ok(AppState::new(Arc::new(service)))
}
