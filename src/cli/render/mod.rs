//! Render command - runs the pipeline once and writes the page

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::infrastructure::presentation::{render_html, HtmlPresenter};

/// Arguments for the render command
#[derive(Args, Clone)]
pub struct RenderArgs {
    /// File to write the HTML page to (stdout when omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Render the dashboard to HTML
pub async fn run(args: RenderArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    let service = crate::create_dashboard_service(&config)?;

    let mut presenter = HtmlPresenter::new();
    service.run(&mut presenter).await?;
    let html = render_html(presenter.page())?;

    match args.output {
        Some(path) => {
            tokio::fs::write(&path, html)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Dashboard written");
        }
        None => print!("{}", html),
    }

    Ok(())
}
