//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::DashboardServiceTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<dyn DashboardServiceTrait>,
}

impl AppState {
    pub fn new(dashboard: Arc<dyn DashboardServiceTrait>) -> Self {
        Self { dashboard }
    }
}
