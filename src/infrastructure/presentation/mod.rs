//! Presentation infrastructure

mod html;

pub use html::{render_html, HtmlPresenter};
