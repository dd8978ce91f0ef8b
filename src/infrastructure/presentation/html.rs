//! HTML page presenter
//!
//! Collects page elements and renders them as a standalone HTML document.
//! Charts are embedded as Vega-Lite specs and drawn client-side by
//! vega-embed; markdown is rendered server-side with raw HTML escaped.

use pulldown_cmark::escape::escape_html;
use pulldown_cmark::{html, Event, Parser};
use serde_json::json;

use crate::domain::chart::{ChartOptions, ChartSpec};
use crate::domain::presentation::{Page, PageElement, Presenter};
use crate::domain::DomainError;

const VEGA_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:1100px;margin:2rem auto;padding:0 1rem;color:#262730}\
.chart{width:100%}";

/// Presenter that accumulates a [`Page`]
#[derive(Debug, Default)]
pub struct HtmlPresenter {
    page: Page,
}

impl HtmlPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn into_page(self) -> Page {
        self.page
    }
}

impl Presenter for HtmlPresenter {
    fn title(&mut self, text: &str) {
        self.page.elements.push(PageElement::Title {
            text: text.to_string(),
        });
    }

    fn write(&mut self, text: &str) {
        self.page.elements.push(PageElement::Text {
            text: text.to_string(),
        });
    }

    fn markdown(&mut self, text: &str) {
        self.page.elements.push(PageElement::Markdown {
            source: text.to_string(),
        });
    }

    fn render_chart(
        &mut self,
        spec: &ChartSpec,
        options: &ChartOptions,
    ) -> Result<(), DomainError> {
        self.page.elements.push(PageElement::Chart {
            spec: options.apply(spec),
            options: options.clone(),
        });
        Ok(())
    }
}

fn escape(text: &str) -> Result<String, DomainError> {
    let mut out = String::with_capacity(text.len());
    escape_html(&mut out, text)
        .map_err(|e| DomainError::presentation(format!("Failed to escape text: {}", e)))?;
    Ok(out)
}

fn render_markdown(source: &str) -> String {
    let events = Parser::new(source).map(|event| match event {
        Event::Html(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

/// JSON that is safe to inline inside a `<script>` element
fn script_json(value: &serde_json::Value) -> Result<String, DomainError> {
    let json = serde_json::to_string(value)
        .map_err(|e| DomainError::presentation(format!("Failed to encode chart: {}", e)))?;
    Ok(json.replace("</", "<\\/"))
}

/// Render `page` as a complete HTML document
pub fn render_html(page: &Page) -> Result<String, DomainError> {
    let mut body = String::new();
    let mut chart_index = 0;

    for element in &page.elements {
        match element {
            PageElement::Title { text } => {
                body.push_str(&format!("<h1>{}</h1>\n", escape(text)?));
            }
            PageElement::Text { text } => {
                body.push_str(&format!("<p>{}</p>\n", escape(text)?));
            }
            PageElement::Markdown { source } => {
                body.push_str(&render_markdown(source));
            }
            PageElement::Chart { spec, options } => {
                let spec = serde_json::to_value(spec).map_err(|e| {
                    DomainError::presentation(format!("Failed to encode chart: {}", e))
                })?;

                let mut embed = json!({ "actions": false });
                if let Some(theme) = &options.theme {
                    embed["theme"] = json!(theme);
                }

                body.push_str(&format!(
                    "<div id=\"chart-{index}\" class=\"chart\"></div>\n\
                     <script>vegaEmbed(\"#chart-{index}\", {spec}, {embed});</script>\n",
                    index = chart_index,
                    spec = script_json(&spec)?,
                    embed = script_json(&embed)?,
                ));
                chart_index += 1;
            }
        }
    }

    let title = escape(page.title().unwrap_or("Dashboard"))?;
    let scripts: String = VEGA_SCRIPTS
        .iter()
        .map(|src| format!("<script src=\"{}\"></script>\n", src))
        .collect();

    Ok(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n{scripts}<style>{style}</style>\n</head>\n\
         <body>\n{body}</body>\n</html>\n",
        title = title,
        scripts = scripts,
        style = STYLE,
        body = body,
    ))
}
