//! Infrastructure services

mod dashboard_service;

pub use dashboard_service::{
    build_prediction_chart, load_model, run_inference, DashboardService, DashboardServiceTrait,
    DATE_COLUMN,
};
