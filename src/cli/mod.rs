//! CLI module for the prediction dashboard
//!
//! Provides subcommands:
//! - `serve`: HTTP server re-running the pipeline per request
//! - `render`: run the pipeline once and write the HTML page

pub mod render;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Prediction Dashboard - model predictions as an interactive chart
#[derive(Parser)]
#[command(name = "prediction-dashboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the dashboard over HTTP
    Serve,

    /// Render the dashboard once to HTML
    Render(render::RenderArgs),
}

/// Load `.env` and configuration, then start logging
fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);
    Ok(config)
}
