//! Presentation domain - page elements and the presenter seam

use serde::Serialize;
#[cfg(test)]
use mockall::automock;

use crate::domain::chart::{ChartOptions, ChartSpec};
use crate::domain::DomainError;

/// Output surface of the dashboard
#[cfg_attr(test, automock)]
pub trait Presenter: Send {
    fn title(&mut self, text: &str);

    fn write(&mut self, text: &str);

    fn markdown(&mut self, text: &str);

    fn render_chart(&mut self, spec: &ChartSpec, options: &ChartOptions)
        -> Result<(), DomainError>;
}

/// One rendered element of a page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageElement {
    Title { text: String },
    Text { text: String },
    Markdown { source: String },
    Chart { spec: ChartSpec, options: ChartOptions },
}

/// Ordered page contents
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub elements: Vec<PageElement>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// First title on the page
    pub fn title(&self) -> Option<&str> {
        self.elements.iter().find_map(|element| match element {
            PageElement::Title { text } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn charts(&self) -> impl Iterator<Item = (&ChartSpec, &ChartOptions)> {
        self.elements.iter().filter_map(|element| match element {
            PageElement::Chart { spec, options } => Some((spec, options)),
            _ => None,
        })
    }
}
