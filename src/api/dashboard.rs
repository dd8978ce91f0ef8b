//! Dashboard endpoint handlers
//!
//! Every request runs the pipeline against a fresh session.

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ModelsResponse};
use crate::domain::{ChartSpec, Page};
use crate::infrastructure::presentation::render_html;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/chart", get(get_chart))
        .route("/models", get(list_models))
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let page = state.dashboard.render_page().await?;
    Ok(Html(render_html(&page)?))
}

/// GET /api/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Page>, ApiError> {
    debug!("Rendering dashboard page");
    Ok(Json(state.dashboard.render_page().await?))
}

/// GET /api/chart
pub async fn get_chart(State(state): State<AppState>) -> Result<Json<ChartSpec>, ApiError> {
    debug!("Rendering prediction chart");
    Ok(Json(state.dashboard.prediction_chart().await?))
}

/// GET /api/models
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<ModelsResponse>, ApiError> {
    let namespace = state.dashboard.settings().namespace.clone();
    debug!(namespace = %namespace, "Listing models");

    let models = state.dashboard.list_models().await?;
    Ok(Json(ModelsResponse::new(namespace, models)))
}
